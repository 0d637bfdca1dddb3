use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ReplayService, SeaOrmReplayService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub replay_service: Arc<dyn ReplayService>,
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

    /// Builds the services over an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let replay_service = Arc::new(SeaOrmReplayService::new(
            store.clone(),
            config.search.clone(),
        )) as Arc<dyn ReplayService>;

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            replay_service,
        }
    }
}
