//! Best-effort audit trail.

use tracing::warn;
use uuid::Uuid;

use crate::db::Store;
use crate::domain::{Action, requester_kind};

/// Appends history entries for a requester, falling back to the system
/// account for anonymous or unknown requesters. Failures are logged and
/// never returned.
#[derive(Clone)]
pub struct HistoryRecorder {
    store: Store,
}

impl HistoryRecorder {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn record(&self, requester: Option<Uuid>, action: Action, details: Option<String>) {
        if let Err(e) = self.try_record(requester, action, details).await {
            warn!(
                event = "history_write_failed",
                action = %action,
                requester = requester_kind(requester),
                error = %e,
                "Failed to record history"
            );
        }
    }

    async fn try_record(
        &self,
        requester: Option<Uuid>,
        action: Action,
        details: Option<String>,
    ) -> anyhow::Result<()> {
        let account = match requester {
            Some(guid) => self.store.get_account(guid).await?,
            None => None,
        };

        let account = match account {
            Some(account) => account,
            None => self
                .store
                .get_system_account()
                .await?
                .ok_or_else(|| anyhow::anyhow!("System account is missing"))?,
        };

        self.store.add_history(account.id, action, details).await
    }
}
