use serde::Serialize;

use crate::entities::accounts;

/// Read-only view of an account as far as searching is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i32,
    pub guid: String,
    pub username: String,
    pub is_admin: bool,
    pub redact_information: bool,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            guid: model.guid,
            username: model.username,
            is_admin: model.is_admin,
            redact_information: model.redact_information,
        }
    }
}
