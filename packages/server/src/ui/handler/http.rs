//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Liveness text served at `/`
pub async fn liveness() -> &'static str {
    "XOR Backend is running!"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let rooms = state.hub.get_rooms().await.map_err(|e| {
        tracing::error!("Failed to get rooms: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Domain Model から DTO への変換
    Ok(Json(rooms.iter().map(RoomSummaryDto::from).collect()))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.hub.get_room_detail(room_id).await {
        Ok(Ok(room)) => Ok(Json(RoomDetailDto::from(&room))),
        Ok(Err(GetRoomDetailError::RoomNotFound(_))) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get room detail: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
