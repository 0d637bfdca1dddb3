use sea_orm::entity::prelude::*;

/// Round-end player entry, owned by a replay.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub replay_id: i32,
    /// Lower-case hyphenated GUID, stored as text so it can be substring matched.
    pub player_guid: String,
    pub player_ic_name: String,
    pub player_ooc_name: String,
    pub player_ic_name_folded: String,
    pub player_ooc_name_folded: String,
    pub job: Option<String>,
    pub antag: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::replays::Entity",
        from = "Column::ReplayId",
        to = "super::replays::Column::Id",
        on_delete = "Cascade"
    )]
    Replay,
}

impl Related<super::replays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Replay.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
