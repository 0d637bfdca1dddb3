use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Player GUID this account is linked to. The nil GUID is the system account.
    #[sea_orm(unique)]
    pub guid: String,

    pub username: String,

    /// `username` folded with [`crate::domain::fold_case`].
    pub username_folded: String,

    pub is_admin: bool,

    /// When set, the player's identifying fields are hidden from other viewers.
    pub redact_information: bool,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::history_entries::Entity")]
    HistoryEntries,
}

impl Related<super::history_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoryEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
