use crate::entities::prelude::*;
use crate::entities::{accounts, players};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Username of the account that collects history for anonymous viewers.
const SYSTEM_USERNAME: &str = "System";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Replays)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Players)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Accounts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(HistoryEntries)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_replay_id")
                    .table(Players)
                    .col(players::Column::ReplayId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_player_guid")
                    .table(Players)
                    .col(players::Column::PlayerGuid)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Accounts)
            .columns([
                accounts::Column::Guid,
                accounts::Column::Username,
                accounts::Column::UsernameFolded,
                accounts::Column::IsAdmin,
                accounts::Column::RedactInformation,
                accounts::Column::CreatedAt,
            ])
            .values_panic([
                uuid::Uuid::nil().to_string().into(),
                SYSTEM_USERNAME.into(),
                crate::domain::fold_case(SYSTEM_USERNAME).into(),
                false.into(),
                false.into(),
                chrono::Utc::now().to_rfc3339().into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HistoryEntries).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Replays).to_owned())
            .await?;

        Ok(())
    }
}
