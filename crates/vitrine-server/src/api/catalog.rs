use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use vitrine_catalog::CatalogSource;

use crate::middleware::RequestId;
use crate::redirect::GateState;
use crate::toast::Toast;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ReloadData {
    source: CatalogSource,
    cards: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct OutboundData {
    total: u64,
    by_store: BTreeMap<String, u64>,
    gate: GateState,
}

pub(super) async fn reload_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ReloadData>> {
    let source = state.storefront.reload().await;
    let cards = state.storefront.card_count().await;
    ApiResponse::new(req_id.0, ReloadData { source, cards })
}

pub(super) async fn current_toast(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Option<Toast>>> {
    ApiResponse::new(req_id.0, state.storefront.toasts().current().await)
}

pub(super) async fn outbound_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<OutboundData>> {
    let gate = state.storefront.gate();
    let by_store = gate.opener().counts();
    ApiResponse::new(
        req_id.0,
        OutboundData {
            total: by_store.values().sum(),
            by_store,
            gate: gate.state(),
        },
    )
}
