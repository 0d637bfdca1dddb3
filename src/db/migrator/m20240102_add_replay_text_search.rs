use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// External-content FTS5 index over `replays.round_end_text`, kept in sync by triggers.
const UP: &[&str] = &[
    "CREATE VIRTUAL TABLE IF NOT EXISTS replay_text_search USING fts5(
        round_end_text,
        content='replays',
        content_rowid='id'
    )",
    "CREATE TRIGGER IF NOT EXISTS replays_text_search_ai AFTER INSERT ON replays BEGIN
        INSERT INTO replay_text_search(rowid, round_end_text)
        VALUES (new.id, new.round_end_text);
    END",
    "CREATE TRIGGER IF NOT EXISTS replays_text_search_ad AFTER DELETE ON replays BEGIN
        INSERT INTO replay_text_search(replay_text_search, rowid, round_end_text)
        VALUES ('delete', old.id, old.round_end_text);
    END",
    "CREATE TRIGGER IF NOT EXISTS replays_text_search_au AFTER UPDATE ON replays BEGIN
        INSERT INTO replay_text_search(replay_text_search, rowid, round_end_text)
        VALUES ('delete', old.id, old.round_end_text);
        INSERT INTO replay_text_search(rowid, round_end_text)
        VALUES (new.id, new.round_end_text);
    END",
    "INSERT INTO replay_text_search(replay_text_search) VALUES ('rebuild')",
];

const DOWN: &[&str] = &[
    "DROP TRIGGER IF EXISTS replays_text_search_au",
    "DROP TRIGGER IF EXISTS replays_text_search_ad",
    "DROP TRIGGER IF EXISTS replays_text_search_ai",
    "DROP TABLE IF EXISTS replay_text_search",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for statement in UP {
            conn.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for statement in DOWN {
            conn.execute_unprepared(statement).await?;
        }
        Ok(())
    }
}
