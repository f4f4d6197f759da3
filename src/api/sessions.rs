//! Training session and attendance endpoints under `/api/sessions`.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::validate_location;
use super::{ApiError, ApiResponse, AppState, MessageResponse, SessionCreatedResponse};
use crate::models::Session;
use crate::services::AuthUser;
use crate::services::session_service::{AttendanceDetail, AttendanceRequest, SessionRequest};

/// `POST /api/sessions`
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<SessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionCreatedResponse>>), ApiError> {
    validate_location(&payload.location)?;

    let session_id = state.session_service().create(&caller, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SessionCreatedResponse { session_id })),
    ))
}

/// `GET /api/sessions`
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Session>>>, ApiError> {
    let sessions = state.session_service().list().await?;
    Ok(Json(ApiResponse::success(sessions)))
}

/// `PUT /api/sessions/{id}`
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validate_location(&payload.location)?;

    state
        .session_service()
        .update(&caller, &id, payload)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Session updated successfully",
    ))))
}

/// `DELETE /api/sessions/{id}`
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.session_service().delete(&caller, &id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Session deleted successfully",
    ))))
}

/// `POST /api/sessions/attendance`
pub async fn submit_attendance(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .session_service()
        .submit_attendance(&caller, payload)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Attendance recorded",
    ))))
}

/// `GET /api/sessions/{id}/attendance`
pub async fn get_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AttendanceDetail>>, ApiError> {
    let detail = state.session_service().attendance_detail(&id).await?;
    Ok(Json(ApiResponse::success(detail)))
}
