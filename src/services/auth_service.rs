//! Domain service for accounts and authentication.
//!
//! Handles registration, login, token verification, profile management and
//! the manager-only player administration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ProfileInfo, Role, User};
use crate::models::user::ProfileUpdate;
use crate::services::token::AuthUser;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Manager role required")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Defaults to `player` when omitted.
    pub role: Option<String>,
}

/// Public subset of an account returned alongside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Result of a successful register or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: UserSummary,
}

/// Account profile as returned by the profile and player-listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub profile_info: ProfileInfo,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            profile_info: user.profile_info,
            image_url: user.image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account with an empty profile and signs a token for it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the email is already registered.
    async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AuthError>;

    /// Verifies credentials and signs a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email and for
    /// a wrong password alike.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Decodes a bearer token into the caller's identity.
    fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError>;

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, AuthError>;

    /// Replaces name, image and profile fields of the caller's account.
    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError>;

    /// Lists player accounts. Managers only.
    async fn list_players(&self, caller: &AuthUser) -> Result<Vec<UserProfile>, AuthError>;

    /// Deletes a player account. Managers only; a manager account is never
    /// matched.
    async fn delete_player(&self, caller: &AuthUser, player_id: &str) -> Result<(), AuthError>;
}
