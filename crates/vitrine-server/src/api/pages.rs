use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::filter::{FilterQuery, FilterState};
use crate::middleware::prefers_dark;
use crate::render::{render_interstitial, render_not_found};
use crate::share::SharePlatform;

use super::{parse_card_id, AppState};

pub(super) async fn index(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
) -> Html<String> {
    let filter = FilterState::from_query(&query);
    Html(
        state
            .storefront
            .page_html(&filter, prefers_dark(&headers))
            .await,
    )
}

/// Shows the redirect overlay and drives the gate in the background.
pub(super) async fn go(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let storefront = &state.storefront;
    let card = match parse_card_id(&id) {
        Some(id) => storefront.card(id).await,
        None => None,
    };
    let Some(card) = card else {
        return not_found().await.into_response();
    };

    let gate = Arc::clone(storefront.gate());
    let delay_ms = u64::try_from(gate.delay().as_millis()).unwrap_or(u64::MAX);
    let (store, destination) = (card.store.clone(), card.destination_url.clone());
    tokio::spawn(async move { gate.trigger(&store, &destination).await });

    Html(render_interstitial(&card.store, &card.destination_url, delay_ms)).into_response()
}

pub(super) async fn share(
    State(state): State<AppState>,
    Path((id, platform)): Path<(String, String)>,
) -> Response {
    let Some(platform) = SharePlatform::parse(&platform) else {
        return (StatusCode::BAD_REQUEST, "unknown share platform").into_response();
    };
    let card = match parse_card_id(&id) {
        Some(id) => state.storefront.card(id).await,
        None => None,
    };
    match card {
        Some(card) => Redirect::to(&platform.share_url(&card)).into_response(),
        None => not_found().await.into_response(),
    }
}

/// Form fallback for the favorite button; returns to the same filter.
pub(super) async fn toggle_favorite_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let toggled = match parse_card_id(&id) {
        Some(id) => state.storefront.toggle_favorite(id).await,
        None => Ok(None),
    };
    match toggled {
        Ok(Some(_)) => Redirect::to(&FilterState::from_query(&query).href()).into_response(),
        Ok(None) => not_found().await.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "favorite could not be saved");
            (StatusCode::INTERNAL_SERVER_ERROR, "favorite could not be saved").into_response()
        }
    }
}

pub(super) async fn toggle_theme_form(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
) -> Response {
    match state.storefront.toggle_theme(prefers_dark(&headers)).await {
        Ok(_) => Redirect::to(&FilterState::from_query(&query).href()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "theme could not be saved");
            (StatusCode::INTERNAL_SERVER_ERROR, "theme could not be saved").into_response()
        }
    }
}

pub(super) async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(render_not_found()))
}
