mod cards;
mod catalog;
mod favorites;
mod pages;
mod theme;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use vitrine_catalog::CatalogSource;

use crate::middleware::{advertise_color_scheme_hint, request_id, RequestId};
use crate::storage::StorageError;
use crate::storefront::Storefront;

#[derive(Clone)]
pub struct AppState {
    pub storefront: Arc<Storefront>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    catalog: Option<CatalogSource>,
    cards: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub(super) fn card_not_found(request_id: String, id: &str) -> Self {
        Self::new(request_id, "not_found", format!("no card with id {id}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_storage_error(request_id: String, error: &StorageError) -> ApiError {
    tracing::error!(error = %error, "visitor state could not be saved");
    ApiError::new(request_id, "internal_error", "visitor state could not be saved")
}

/// Card ids are board positions; anything else is an unknown card.
pub(super) fn parse_card_id(raw: &str) -> Option<usize> {
    raw.parse().ok()
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static(crate::middleware::COLOR_SCHEME_HINT),
        ])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/cards", get(cards::list_cards))
        .route("/api/v1/favorites", get(favorites::list_favorites))
        .route(
            "/api/v1/favorites/{id}/toggle",
            post(favorites::toggle_favorite),
        )
        .route("/api/v1/theme", get(theme::get_theme))
        .route("/api/v1/theme/toggle", post(theme::toggle_theme))
        .route("/api/v1/catalog/reload", post(catalog::reload_catalog))
        .route("/api/v1/toast", get(catalog::current_toast))
        .route("/api/v1/outbound", get(catalog::outbound_stats))
}

fn page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/go/{id}", get(pages::go))
        .route("/share/{id}/{platform}", get(pages::share))
        .route("/favorites/{id}/toggle", post(pages::toggle_favorite_form))
        .route("/theme/toggle", post(pages::toggle_theme_form))
        .layer(axum::middleware::from_fn(advertise_color_scheme_hint))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api_router())
        .merge(page_router())
        .fallback(pages::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let storefront = &state.storefront;
    let catalog = storefront.source();
    let cards = storefront.card_count().await;
    let status = if catalog.is_some() { "ok" } else { "starting" };

    ApiResponse::new(
        req_id.0,
        HealthData {
            status,
            catalog,
            cards,
        },
    )
}

#[cfg(test)]
#[path = "../api_test.rs"]
mod tests;
