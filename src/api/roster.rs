//! Legacy squad sheet at `/players`. Unauthenticated.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::models::RosterPlayer;
use crate::models::roster::RosterPlayerInput;

pub async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<RosterPlayer>>>, ApiError> {
    let players = state.roster_service().list().await?;
    Ok(Json(ApiResponse::success(players)))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RosterPlayer>>, ApiError> {
    let player = state.roster_service().get(&id).await?;
    Ok(Json(ApiResponse::success(player)))
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RosterPlayerInput>,
) -> Result<(StatusCode, Json<ApiResponse<RosterPlayer>>), ApiError> {
    let player = state.roster_service().create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(player))))
}

pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<RosterPlayerInput>,
) -> Result<Json<ApiResponse<RosterPlayer>>, ApiError> {
    let player = state.roster_service().update(&id, payload).await?;
    Ok(Json(ApiResponse::success(player)))
}

pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.roster_service().delete(&id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Player removed",
    ))))
}
