use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::domain::Action;
use crate::entities::{history_entries, prelude::*};

pub use crate::entities::history_entries::Model as HistoryEntry;

pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, account_id: i32, action: Action, details: Option<String>) -> Result<()> {
        let active_model = history_entries::ActiveModel {
            account_id: Set(account_id),
            action: Set(action.to_string()),
            time: Set(chrono::Utc::now().to_rfc3339()),
            details: Set(details),
            ..Default::default()
        };

        HistoryEntries::insert(active_model).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn list_for_account(&self, account_id: i32, limit: u64) -> Result<Vec<HistoryEntry>> {
        let entries = HistoryEntries::find()
            .filter(history_entries::Column::AccountId.eq(account_id))
            .order_by_desc(history_entries::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(entries)
    }
}
