use anyhow::{Context, Result};
use sea_orm::sea_query::{Alias, Expr, Func, IntoColumnRef, LikeExpr, NullOrdering, Query, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, LoaderTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::{ReplayId, SearchMode, fold_case};
use crate::entities::{players, prelude::*, replays};
use crate::models::{NewReplay, Replay};

/// Matches for one search: the capped, ordered rows plus the uncapped count.
#[derive(Debug, Clone)]
pub struct ReplayMatches {
    pub replays: Vec<Replay>,
    pub total: u64,
}

pub struct ReplayRepository {
    conn: DatabaseConnection,
}

impl ReplayRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Runs the predicate for `mode`, newest first, keeping at most `limit` rows.
    pub async fn search(&self, mode: SearchMode, query: &str, limit: u64) -> Result<ReplayMatches> {
        let condition = mode_condition(mode, query);

        let total = Replays::find()
            .filter(condition.clone())
            .count(&self.conn)
            .await
            .with_context(|| format!("Failed to count replays for {mode} search"))?;

        let rows = Replays::find()
            .filter(condition)
            .order_by_with_nulls(replays::Column::Date, Order::Desc, NullOrdering::Last)
            .order_by_desc(replays::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to load replays for {mode} search"))?;

        let replays = self.attach_players(rows).await?;
        Ok(ReplayMatches { replays, total })
    }

    pub async fn get(&self, id: ReplayId) -> Result<Option<Replay>> {
        let Some(row) = Replays::find_by_id(id.value()).one(&self.conn).await? else {
            return Ok(None);
        };

        Ok(self.attach_players(vec![row]).await?.pop())
    }

    /// Most recently stored replays, by insertion order rather than round date.
    pub async fn most_recent(&self, limit: u64) -> Result<Vec<Replay>> {
        let rows = Replays::find()
            .order_by_desc(replays::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        self.attach_players(rows).await
    }

    pub async fn list_ids(&self) -> Result<Vec<ReplayId>> {
        let ids: Vec<i32> = Replays::find()
            .select_only()
            .column(replays::Column::Id)
            .order_by_asc(replays::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(ids.into_iter().map(ReplayId::new).collect())
    }

    pub async fn add(&self, replay: NewReplay) -> Result<ReplayId> {
        let txn = self.conn.begin().await?;

        let inserted = replays::ActiveModel {
            map_folded: Set(fold_case(&replay.map)),
            gamemode_folded: Set(fold_case(&replay.gamemode)),
            server_id_folded: Set(fold_case(&replay.server_id)),
            server_name_folded: Set(replay.server_name.as_deref().map(fold_case)),
            link: Set(replay.link),
            map: Set(replay.map),
            gamemode: Set(replay.gamemode),
            server_id: Set(replay.server_id),
            server_name: Set(replay.server_name),
            round_id: Set(replay.round_id),
            date: Set(replay.date),
            duration: Set(replay.duration),
            round_end_text: Set(replay.round_end_text),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert replay")?;

        if !replay.players.is_empty() {
            let players = replay.players.into_iter().map(|p| players::ActiveModel {
                replay_id: Set(inserted.id),
                player_guid: Set(p.player_guid.to_lowercase()),
                player_ic_name_folded: Set(fold_case(&p.player_ic_name)),
                player_ooc_name_folded: Set(fold_case(&p.player_ooc_name)),
                player_ic_name: Set(p.player_ic_name),
                player_ooc_name: Set(p.player_ooc_name),
                job: Set(p.job),
                antag: Set(p.antag),
                ..Default::default()
            });

            Players::insert_many(players)
                .exec(&txn)
                .await
                .context("Failed to insert round end players")?;
        }

        txn.commit().await?;
        Ok(ReplayId::new(inserted.id))
    }

    async fn attach_players(&self, rows: Vec<replays::Model>) -> Result<Vec<Replay>> {
        let players = rows
            .load_many(
                Players::find().order_by_asc(players::Column::Id),
                &self.conn,
            )
            .await
            .context("Failed to load round end players")?;

        Ok(rows
            .into_iter()
            .zip(players)
            .map(|(replay, players)| Replay::from_models(replay, players))
            .collect())
    }
}

/// Builds the replay filter for a mode. Every mode has an arm, so a mode that
/// is added without a predicate fails to compile.
fn mode_condition(mode: SearchMode, query: &str) -> Condition {
    match mode {
        SearchMode::Map => Condition::all().add(contains_ci(replays::Column::MapFolded, query)),
        SearchMode::Gamemode => {
            Condition::all().add(contains_ci(replays::Column::GamemodeFolded, query))
        }
        SearchMode::ServerId => {
            Condition::all().add(contains_ci(replays::Column::ServerIdFolded, query))
        }
        SearchMode::ServerName => Condition::all()
            .add(replays::Column::ServerNameFolded.is_not_null())
            .add(contains_ci(replays::Column::ServerNameFolded, query)),
        SearchMode::RoundId => Condition::all()
            .add(replays::Column::RoundId.is_not_null())
            .add(
                Expr::expr(Func::cast_as(
                    Expr::col(replays::Column::RoundId),
                    Alias::new("TEXT"),
                ))
                .like(contains_pattern(query)),
            ),
        SearchMode::RoundEndText => Condition::all().add(Expr::cust_with_values(
            "\"replays\".\"id\" IN (SELECT rowid FROM replay_text_search WHERE replay_text_search MATCH ?)",
            [fts_query(query)],
        )),
        SearchMode::Guid => participant_condition(players::Column::PlayerGuid, query),
        SearchMode::PlayerIcName => {
            participant_condition(players::Column::PlayerIcNameFolded, query)
        }
        SearchMode::PlayerOocName => {
            participant_condition(players::Column::PlayerOocNameFolded, query)
        }
    }
}

/// Replays owning at least one round end player whose `column` contains `query`.
fn participant_condition(column: players::Column, query: &str) -> Condition {
    let replay_ids = Query::select()
        .distinct()
        .column(players::Column::ReplayId)
        .from(Players)
        .and_where(contains_ci(column, query))
        .to_owned();

    Condition::all().add(replays::Column::Id.in_subquery(replay_ids))
}

/// Case-insensitive substring match with LIKE wildcards in `query` taken literally.
///
/// `column` must already hold [`fold_case`]d text (a `*_folded` column, or a
/// GUID, which is stored lower case).
pub(crate) fn contains_ci<C: IntoColumnRef>(column: C, query: &str) -> SimpleExpr {
    Expr::col(column).like(contains_pattern(&fold_case(query)))
}

fn contains_pattern(query: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(query))).escape('\\')
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Quotes each whitespace separated term so user text is never parsed as
/// FTS5 query syntax. Terms are implicitly AND-ed.
fn fts_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("box"), "box");
    }

    #[test]
    fn fts_terms_are_quoted() {
        assert_eq!(fts_query("nuke  the station"), "\"nuke\" \"the\" \"station\"");
        assert_eq!(fts_query("say \"hi\" OR"), "\"say\" \"\"\"hi\"\"\" \"OR\"");
    }
}
