//! Domain service for training sessions and attendance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Session;
use crate::services::token::AuthUser;

/// Errors specific to session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Manager role required")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SessionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub session_id: String,
    /// Defaults to the caller.
    pub user_id: Option<String>,
    pub attending: bool,
}

/// Attendance record with the responding account resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub attending: bool,
    pub responded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    pub session: SessionSummary,
    pub attendance: Vec<AttendanceEntry>,
}

/// Domain service trait for sessions.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Creates a session and returns its id. Managers only.
    async fn create(&self, caller: &AuthUser, request: SessionRequest)
    -> Result<String, SessionError>;

    /// All sessions, earliest first.
    async fn list(&self) -> Result<Vec<Session>, SessionError>;

    /// Replaces date, location and description. Managers only.
    async fn update(
        &self,
        caller: &AuthUser,
        id: &str,
        request: SessionRequest,
    ) -> Result<(), SessionError>;

    /// Deletes a session with its attendance. Managers only.
    async fn delete(&self, caller: &AuthUser, id: &str) -> Result<(), SessionError>;

    /// Records a response, replacing any earlier one by the same user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Forbidden`] when a player answers for someone
    /// else, [`SessionError::NotFound`] when the session doesn't exist.
    async fn submit_attendance(
        &self,
        caller: &AuthUser,
        request: AttendanceRequest,
    ) -> Result<(), SessionError>;

    async fn attendance_detail(&self, id: &str) -> Result<AttendanceDetail, SessionError>;
}
