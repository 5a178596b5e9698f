use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;

use crate::filter::{FilterQuery, FilterState, StoreFilter};
use crate::middleware::RequestId;
use crate::render::Card;

use super::{map_storage_error, parse_card_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct FavoritesData {
    count: usize,
    titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ToggleData {
    id: usize,
    title: String,
    favorite: bool,
    count: usize,
    /// Re-filtered cards, present only while the favorites filter is active.
    visible_cards: Option<Vec<Card>>,
}

pub(super) async fn list_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<FavoritesData>> {
    let titles = state.storefront.favorite_titles().await;
    ApiResponse::new(
        req_id.0,
        FavoritesData {
            count: titles.len(),
            titles,
        },
    )
}

pub(super) async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<ToggleData>>, ApiError> {
    let storefront = &state.storefront;
    let card_id =
        parse_card_id(&id).ok_or_else(|| ApiError::card_not_found(req_id.0.clone(), &id))?;
    let (card, favorite) = storefront
        .toggle_favorite(card_id)
        .await
        .map_err(|e| map_storage_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::card_not_found(req_id.0.clone(), &id))?;

    let filter = FilterState::from_query(&query);
    let (board, favorites) = storefront.snapshot_with_favorites().await;
    let visible_cards = if filter.store == StoreFilter::Favorites {
        Some(
            filter
                .visible(&board, &favorites)
                .into_iter()
                .cloned()
                .collect(),
        )
    } else {
        None
    };

    Ok(ApiResponse::new(
        req_id.0,
        ToggleData {
            id: card.id,
            title: card.title,
            favorite,
            count: favorites.len(),
            visible_cards,
        },
    ))
}
