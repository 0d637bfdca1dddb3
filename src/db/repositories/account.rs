use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::replay::contains_ci;
use crate::domain::fold_case;
use crate::entities::{accounts, prelude::*};
use crate::models::Account;

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_guid(&self, guid: Uuid) -> Result<Option<Account>> {
        let account = Accounts::find()
            .filter(accounts::Column::Guid.eq(guid.to_string()))
            .one(&self.conn)
            .await
            .context("Failed to query account by GUID")?;

        Ok(account.map(Account::from))
    }

    /// The account that collects history for anonymous viewers.
    pub async fn system(&self) -> Result<Option<Account>> {
        self.get_by_guid(Uuid::nil()).await
    }

    /// First account whose GUID contains `query`, case-insensitively.
    pub async fn find_by_guid_fragment(&self, query: &str) -> Result<Option<Account>> {
        let account = Accounts::find()
            .filter(contains_ci(accounts::Column::Guid, query))
            .order_by_asc(accounts::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query account by GUID fragment")?;

        Ok(account.map(Account::from))
    }

    /// First account whose username contains `query`, case-insensitively.
    pub async fn find_by_username_fragment(&self, query: &str) -> Result<Option<Account>> {
        let account = Accounts::find()
            .filter(contains_ci(accounts::Column::UsernameFolded, query))
            .order_by_asc(accounts::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query account by username fragment")?;

        Ok(account.map(Account::from))
    }

    /// Accounts for the given player GUIDs. GUIDs without an account are skipped.
    pub async fn get_by_guids(&self, guids: &[String]) -> Result<Vec<Account>> {
        if guids.is_empty() {
            return Ok(Vec::new());
        }

        let lowered: Vec<String> = guids.iter().map(|g| g.to_lowercase()).collect();
        let accounts = Accounts::find()
            .filter(accounts::Column::Guid.is_in(lowered))
            .all(&self.conn)
            .await
            .context("Failed to query accounts by GUID")?;

        Ok(accounts.into_iter().map(Account::from).collect())
    }

    pub async fn add(
        &self,
        guid: Uuid,
        username: &str,
        is_admin: bool,
        redact_information: bool,
    ) -> Result<Account> {
        let model = accounts::ActiveModel {
            guid: Set(guid.to_string()),
            username: Set(username.to_string()),
            username_folded: Set(fold_case(username)),
            is_admin: Set(is_admin),
            redact_information: Set(redact_information),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert account {username}"))?;

        Ok(Account::from(model))
    }

    pub async fn set_redact_information(&self, guid: Uuid, redact: bool) -> Result<()> {
        let account = Accounts::find()
            .filter(accounts::Column::Guid.eq(guid.to_string()))
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {guid}"))?;

        let mut active: accounts::ActiveModel = account.into();
        active.redact_information = Set(redact);
        active.update(&self.conn).await?;

        Ok(())
    }
}
