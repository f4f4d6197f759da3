//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::constants::limits::MAX_NAME_LEN;
use crate::db::{Store, hash_password_blocking};
use crate::models::Role;
use crate::models::user::{NewUser, ProfileUpdate};
use crate::services::auth_service::{
    AuthError, AuthService, AuthSession, RegisterRequest, UserProfile, UserSummary,
};
use crate::services::token::{AuthUser, TokenSigner};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    signer: TokenSigner,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        let signer = TokenSigner::new(security.jwt_secret.as_bytes(), security.token_ttl());
        Self {
            store,
            signer,
            security,
        }
    }

    fn sign(&self, user: &crate::models::User) -> Result<AuthSession, AuthError> {
        let token = self
            .signer
            .issue(&user.id, user.role)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(AuthSession {
            token,
            user: UserSummary::from(user),
        })
    }
}

/// Trimmed display name, or a validation error when blank or too long.
fn checked_name(raw: &str) -> Result<String, AuthError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AuthError::Validation(format!(
            "Name must be {MAX_NAME_LEN} characters or less"
        )));
    }
    Ok(name.to_string())
}

fn require_manager(caller: &AuthUser) -> Result<(), AuthError> {
    if caller.role.is_manager() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AuthError> {
        let name = checked_name(&request.name)?;
        if request.email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let role = match request.role.as_deref() {
            None => Role::default(),
            Some(raw) => raw.parse::<Role>().map_err(AuthError::Validation)?,
        };

        if self.store.email_exists(&request.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password_blocking(&request.password, &self.security).await?;

        // The unique index catches a registration that raced past the check above.
        let user = self
            .store
            .create_user(NewUser {
                name,
                email: request.email,
                password_hash,
                role,
            })
            .await?
            .ok_or(AuthError::EmailTaken)?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        self.sign(&user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some(user) = self.store.verify_credentials(email, password).await? else {
            warn!("Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        };

        info!(user_id = %user.id, "User logged in");
        self.sign(&user)
    }

    fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.signer
            .verify(token)
            .map(AuthUser::from)
            .map_err(|_| AuthError::Unauthorized)
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        mut update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        update.name = checked_name(&update.name)?;

        let user = self
            .store
            .replace_user_profile(user_id, update)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    async fn list_players(&self, caller: &AuthUser) -> Result<Vec<UserProfile>, AuthError> {
        require_manager(caller)?;

        let players = self.store.list_users_with_role(Role::Player).await?;
        Ok(players.into_iter().map(UserProfile::from).collect())
    }

    async fn delete_player(&self, caller: &AuthUser, player_id: &str) -> Result<(), AuthError> {
        require_manager(caller)?;

        if uuid::Uuid::parse_str(player_id).is_err() {
            return Err(AuthError::UserNotFound);
        }

        if !self.store.delete_user_with_role(player_id, Role::Player).await? {
            return Err(AuthError::UserNotFound);
        }

        info!(player_id, deleted_by = %caller.user_id, "Player deleted");
        Ok(())
    }
}
