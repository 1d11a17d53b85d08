//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::RoomStateDto, ui::state::AppState};

/// Debug endpoint listing the registered participants (for testing purposes)
pub async fn debug_room_state(State(state): State<Arc<AppState>>) -> Json<RoomStateDto> {
    Json(state.room.participants().await.into())
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
