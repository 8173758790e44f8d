use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use domain::RelayStats;

use super::state::AppState;

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<RelayStats> {
    let matchmaking = state.matchmaking_service.lock().await;
    Json(matchmaking.stats())
}
