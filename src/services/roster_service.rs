//! Domain service for the legacy squad sheet.

use thiserror::Error;

use crate::models::RosterPlayer;
use crate::models::roster::RosterPlayerInput;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Player not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RosterError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RosterError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait RosterService: Send + Sync {
    async fn list(&self) -> Result<Vec<RosterPlayer>, RosterError>;

    async fn get(&self, id: &str) -> Result<RosterPlayer, RosterError>;

    async fn create(&self, input: RosterPlayerInput) -> Result<RosterPlayer, RosterError>;

    /// Full replace of name and position.
    async fn update(&self, id: &str, input: RosterPlayerInput)
    -> Result<RosterPlayer, RosterError>;

    async fn delete(&self, id: &str) -> Result<(), RosterError>;
}
