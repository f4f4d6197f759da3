use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, RosterService, SeaOrmAuthService, SeaOrmRosterService, SeaOrmSessionService,
    SessionService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub session_service: Arc<dyn SessionService>,

    pub roster_service: Arc<dyn RosterService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let session_service =
            Arc::new(SeaOrmSessionService::new(store.clone())) as Arc<dyn SessionService>;

        let roster_service =
            Arc::new(SeaOrmRosterService::new(store.clone())) as Arc<dyn RosterService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            session_service,
            roster_service,
        }
    }
}
