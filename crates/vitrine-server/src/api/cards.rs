use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;

use crate::filter::{FilterQuery, FilterState};
use crate::middleware::RequestId;
use crate::render::Card;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CardsData {
    total: usize,
    visible: usize,
    cards: Vec<Card>,
}

pub(super) async fn list_cards(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FilterQuery>,
) -> Json<ApiResponse<CardsData>> {
    let filter = FilterState::from_query(&query);
    let (board, favorites) = state.storefront.snapshot_with_favorites().await;

    let cards: Vec<Card> = filter
        .visible(&board, &favorites)
        .into_iter()
        .cloned()
        .collect();

    ApiResponse::new(
        req_id.0,
        CardsData {
            total: board.len(),
            visible: cards.len(),
            cards,
        },
    )
}
