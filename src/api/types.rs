use serde::Serialize;

use crate::domain::SearchMode;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One entry of the search mode listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchModeDto {
    pub name: &'static str,
    pub ordinal: usize,
    pub alias: &'static str,
}

impl From<SearchMode> for SearchModeDto {
    fn from(mode: SearchMode) -> Self {
        Self {
            name: mode.name(),
            ordinal: mode.ordinal(),
            alias: mode.humanized(),
        }
    }
}
