use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Action, ReplayId, SearchMode};
use crate::models::{Account, NewReplay, Replay};

pub mod migrator;
pub mod repositories;

pub use repositories::history::HistoryEntry;
pub use repositories::replay::ReplayMatches;

/// Record store over replays, round end players, accounts and their history.
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
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
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

    fn replay_repo(&self) -> repositories::replay::ReplayRepository {
        repositories::replay::ReplayRepository::new(self.conn.clone())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn history_repo(&self) -> repositories::history::HistoryRepository {
        repositories::history::HistoryRepository::new(self.conn.clone())
    }

    // ========== Replays ==========

    pub async fn search_replays(
        &self,
        mode: SearchMode,
        query: &str,
        limit: u64,
    ) -> Result<ReplayMatches> {
        self.replay_repo().search(mode, query, limit).await
    }

    pub async fn get_replay(&self, id: ReplayId) -> Result<Option<Replay>> {
        self.replay_repo().get(id).await
    }

    pub async fn most_recent_replays(&self, limit: u64) -> Result<Vec<Replay>> {
        self.replay_repo().most_recent(limit).await
    }

    pub async fn list_replay_ids(&self) -> Result<Vec<ReplayId>> {
        self.replay_repo().list_ids().await
    }

    pub async fn add_replay(&self, replay: NewReplay) -> Result<ReplayId> {
        self.replay_repo().add(replay).await
    }

    // ========== Accounts ==========

    pub async fn get_account(&self, guid: Uuid) -> Result<Option<Account>> {
        self.account_repo().get_by_guid(guid).await
    }

    pub async fn get_system_account(&self) -> Result<Option<Account>> {
        self.account_repo().system().await
    }

    pub async fn find_account_by_guid_fragment(&self, query: &str) -> Result<Option<Account>> {
        self.account_repo().find_by_guid_fragment(query).await
    }

    pub async fn find_account_by_username_fragment(&self, query: &str) -> Result<Option<Account>> {
        self.account_repo().find_by_username_fragment(query).await
    }

    pub async fn get_accounts_by_guids(&self, guids: &[String]) -> Result<Vec<Account>> {
        self.account_repo().get_by_guids(guids).await
    }

    pub async fn add_account(
        &self,
        guid: Uuid,
        username: &str,
        is_admin: bool,
        redact_information: bool,
    ) -> Result<Account> {
        self.account_repo()
            .add(guid, username, is_admin, redact_information)
            .await
    }

    pub async fn set_redact_information(&self, guid: Uuid, redact: bool) -> Result<()> {
        self.account_repo()
            .set_redact_information(guid, redact)
            .await
    }

    // ========== History ==========

    pub async fn add_history(
        &self,
        account_id: i32,
        action: Action,
        details: Option<String>,
    ) -> Result<()> {
        self.history_repo().add(account_id, action, details).await
    }

    pub async fn get_history(&self, account_id: i32, limit: u64) -> Result<Vec<HistoryEntry>> {
        self.history_repo()
            .list_for_account(account_id, limit)
            .await
    }
}
