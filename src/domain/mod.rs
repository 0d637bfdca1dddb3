//! Domain primitives for replay searching.
//!
//! Strongly typed wrappers shared by the store, the services and the API so
//! that raw strings and booleans do not leak across layers.

pub mod search_mode;

pub use search_mode::{InvalidModeError, SearchMode, humanize};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Folds text for case-insensitive substring search.
///
/// Both the stored side and the query go through this, since SQLite's
/// `lower()` and `LIKE` leave non-ASCII letters untouched.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Log label for whoever made a request. The GUID itself is never logged,
/// since pairing it with a search would undo profile redaction.
#[must_use]
pub const fn requester_kind(guid: Option<Uuid>) -> &'static str {
    match guid {
        Some(_) => "identified",
        None => "anonymous",
    }
}

/// Unique identifier for a replay record.
///
/// # Examples
///
/// ```rust
/// use replay_browser::domain::ReplayId;
///
/// let id = ReplayId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReplayId(i32);

impl ReplayId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ReplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ReplayId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// The account (or nobody) on whose behalf a request runs.
///
/// Only used for privacy decisions. An unknown GUID is an ordinary viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewer {
    pub guid: Option<Uuid>,
    pub is_admin: bool,
}

impl Viewer {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            guid: None,
            is_admin: false,
        }
    }

    /// True when `player_guid` names this viewer.
    #[must_use]
    pub fn is_player(&self, player_guid: &str) -> bool {
        self.guid
            .is_some_and(|guid| Uuid::parse_str(player_guid).is_ok_and(|p| p == guid))
    }

    /// Whether this viewer may see the unredacted details of `player_guid`.
    #[must_use]
    pub fn can_see(&self, player_guid: &str) -> bool {
        self.is_admin || self.is_player(player_guid)
    }
}

/// Audit history action tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    AccountSettingsChanged,
    Login,
    SearchPerformed,
    LeaderboardViewed,
    ProfileViewed,
    MainPageViewed,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountSettingsChanged => "AccountSettingsChanged",
            Self::Login => "Login",
            Self::SearchPerformed => "SearchPerformed",
            Self::LeaderboardViewed => "LeaderboardViewed",
            Self::ProfileViewed => "ProfileViewed",
            Self::MainPageViewed => "MainPageViewed",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
