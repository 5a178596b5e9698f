use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::Serialize;
use vitrine_core::ThemePreference;

use crate::middleware::{prefers_dark, RequestId};

use super::{map_storage_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ThemeData {
    theme: ThemePreference,
    saved: bool,
}

pub(super) async fn get_theme(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Json<ApiResponse<ThemeData>> {
    let (theme, saved) = state.storefront.theme(prefers_dark(&headers)).await;
    ApiResponse::new(req_id.0, ThemeData { theme, saved })
}

pub(super) async fn toggle_theme(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<ThemeData>>, ApiError> {
    let theme = state
        .storefront
        .toggle_theme(prefers_dark(&headers))
        .await
        .map_err(|e| map_storage_error(req_id.0.clone(), &e))?;
    tracing::debug!(%theme, "theme toggled");
    Ok(ApiResponse::new(req_id.0, ThemeData { theme, saved: true }))
}
