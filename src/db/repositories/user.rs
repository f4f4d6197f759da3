use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};
use crate::models::user::{NewUser, ProfileInfo, ProfileUpdate, Role, User};

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            // Rows are only ever written through `Role::as_str`.
            role: model.role.parse().unwrap_or_default(),
            profile_info: ProfileInfo {
                age: model.age,
                height: model.height,
                weight: model.weight,
                position: model.position,
                county: model.county,
            },
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a new account.
    ///
    /// Returns `None` when the email is already registered, whether the
    /// caller's pre-check missed a concurrent registration or not.
    pub async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let active = users::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            age: Set(None),
            height: Set(None),
            weight: Set(None),
            position: Set(None),
            county: Set(None),
            image_url: Set(None),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            updated_at: Set(None),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(User::from(model))),
            Err(err) if is_unique_violation(&err) => Ok(None),
            Err(err) => Err(err).context("Failed to insert user"),
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = Users::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.is_some())
    }

    /// Looks up an account by email and checks the password against its hash.
    ///
    /// Returns `None` for an unknown email and for a wrong password alike.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Overwrites name, image and every profile field. Returns `None` if the
    /// account no longer exists.
    pub async fn replace_profile(&self, id: &str, update: ProfileUpdate) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user for profile update")?
        else {
            return Ok(None);
        };

        let profile = update.profile_info;
        let mut active: users::ActiveModel = user.into();
        active.name = Set(update.name);
        active.image_url = Set(update.image_url);
        active.age = Set(profile.age);
        active.height = Set(profile.height);
        active.weight = Set(profile.weight);
        active.position = Set(profile.position);
        active.county = Set(profile.county);
        active.updated_at = Set(Some(chrono::Utc::now().to_rfc3339()));

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update user profile")?;

        Ok(Some(User::from(model)))
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>> {
        let rows = Users::find()
            .filter(users::Column::Role.eq(role.as_str()))
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list users by role")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Deletes the account only if it currently has `role`.
    pub async fn delete_with_role(&self, id: &str, role: Role) -> Result<bool> {
        let result = Users::delete_many()
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Role.eq(role.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate's default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Hashes on the blocking pool.
pub async fn hash_password_blocking(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();
    task::spawn_blocking(move || hash_password(&password, Some(&config)))
        .await
        .context("Password hashing task panicked")?
}
