use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::roster::RosterPlayer;
use crate::models::session::{AttendanceRecord, Session, SessionFields};
use crate::models::user::{NewUser, ProfileUpdate, Role, User};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{hash_password, hash_password_blocking};

/// Handle to the application database.
///
/// Constructed once at startup and cloned into every service; the clone
/// shares the underlying connection pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn roster_repo(&self) -> repositories::roster::RosterRepository {
        repositories::roster::RosterRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(&self, new_user: NewUser) -> Result<Option<User>> {
        self.user_repo().create(new_user).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn replace_user_profile(
        &self,
        id: &str,
        update: ProfileUpdate,
    ) -> Result<Option<User>> {
        self.user_repo().replace_profile(id, update).await
    }

    pub async fn list_users_with_role(&self, role: Role) -> Result<Vec<User>> {
        self.user_repo().list_by_role(role).await
    }

    pub async fn delete_user_with_role(&self, id: &str, role: Role) -> Result<bool> {
        self.user_repo().delete_with_role(id, role).await
    }

    // ========================================================================
    // Sessions & attendance
    // ========================================================================

    pub async fn create_session(&self, fields: SessionFields) -> Result<String> {
        self.session_repo().create(fields).await
    }

    pub async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        self.session_repo().get(id).await
    }

    pub async fn session_exists(&self, id: &str) -> Result<bool> {
        self.session_repo().exists(id).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.session_repo().list().await
    }

    pub async fn update_session(&self, id: &str, fields: SessionFields) -> Result<bool> {
        self.session_repo().update(id, fields).await
    }

    pub async fn remove_session(&self, id: &str) -> Result<bool> {
        self.session_repo().remove(id).await
    }

    /// Upserts one response. `false` means the session was gone.
    pub async fn record_attendance(
        &self,
        session_id: &str,
        user_id: &str,
        attending: bool,
    ) -> Result<bool> {
        self.session_repo()
            .upsert_attendance(session_id, user_id, attending)
            .await
    }

    pub async fn get_attendance(&self, session_id: &str) -> Result<Vec<AttendanceRecord>> {
        self.session_repo().attendance_for(session_id).await
    }

    // ========================================================================
    // Roster
    // ========================================================================

    pub async fn list_roster(&self) -> Result<Vec<RosterPlayer>> {
        self.roster_repo().list().await
    }

    pub async fn get_roster_player(&self, id: &str) -> Result<Option<RosterPlayer>> {
        self.roster_repo().get(id).await
    }

    pub async fn add_roster_player(
        &self,
        name: &str,
        position: Option<&str>,
    ) -> Result<RosterPlayer> {
        self.roster_repo().add(name, position).await
    }

    pub async fn replace_roster_player(
        &self,
        id: &str,
        name: &str,
        position: Option<&str>,
    ) -> Result<Option<RosterPlayer>> {
        self.roster_repo().replace(id, name, position).await
    }

    pub async fn remove_roster_player(&self, id: &str) -> Result<bool> {
        self.roster_repo().remove(id).await
    }
}
