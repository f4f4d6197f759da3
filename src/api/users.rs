//! Account endpoints under `/api/users`.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LoginRequest, MessageResponse, VerifyResponse};
use crate::models::user::ProfileUpdate;
use crate::services::AuthUser;
use crate::services::auth_service::{AuthSession, RegisterRequest, UserProfile};

/// `POST /api/users/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthSession>>), ApiError> {
    let session = state.auth_service().register(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(session))))
}

/// `POST /api/users/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let session = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(session)))
}

/// `GET /api/users/verify`
///
/// The token was already checked by the middleware; this confirms the
/// account behind it still exists.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<VerifyResponse>>, ApiError> {
    let user = state.auth_service().get_profile(&caller.user_id).await?;
    Ok(Json(ApiResponse::success(VerifyResponse { valid: true, user })))
}

/// `GET /api/users/profile`
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.auth_service().get_profile(&caller.user_id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// `PUT /api/users/profile`
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .auth_service()
        .update_profile(&caller.user_id, payload)
        .await?;

    Ok(Json(ApiResponse::success(profile)))
}

/// `GET /api/users/players`
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let players = state.auth_service().list_players(&caller).await?;
    Ok(Json(ApiResponse::success(players)))
}

/// `DELETE /api/users/players/{id}`
pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service().delete_player(&caller, &id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Player deleted successfully",
    ))))
}
