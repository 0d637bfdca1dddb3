use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "replays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub link: String,
    pub map: String,
    pub gamemode: String,
    pub server_id: String,
    pub server_name: Option<String>,
    /// Case-folded copies used by substring search. SQLite's `lower()` only
    /// folds ASCII, so these are folded in Rust on insert.
    pub map_folded: String,
    pub gamemode_folded: String,
    pub server_id_folded: String,
    pub server_name_folded: Option<String>,
    pub round_id: Option<i32>,
    pub date: Option<DateTimeUtc>,
    pub duration: String,
    /// Indexed by the `replay_text_search` FTS5 table.
    #[sea_orm(column_type = "Text", nullable)]
    pub round_end_text: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::players::Entity")]
    Players,
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
