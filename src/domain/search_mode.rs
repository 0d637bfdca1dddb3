//! Search mode selection.
//!
//! A raw mode string coming from a client is resolved against a static table
//! in fixed priority order: canonical name, then ordinal, then humanized alias.

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Strategy used to match replays against a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchMode {
    /// Substring of the map name.
    Map,
    /// Substring of the game mode.
    Gamemode,
    /// Substring of the server id.
    ServerId,
    /// Substring of a participant's player GUID.
    Guid,
    /// Substring of a participant's in-character name.
    PlayerIcName,
    /// Substring of a participant's out-of-character (account) name.
    PlayerOocName,
    /// Full text search over the round end text.
    RoundEndText,
    /// Substring of the server name. Replays without one never match.
    ServerName,
    /// Substring of the decimal round id. Replays without one never match.
    RoundId,
}

struct ModeEntry {
    mode: SearchMode,
    name: &'static str,
    alias: &'static str,
}

/// Indexed by ordinal.
const MODES: [ModeEntry; 9] = [
    ModeEntry {
        mode: SearchMode::Map,
        name: "Map",
        alias: "map",
    },
    ModeEntry {
        mode: SearchMode::Gamemode,
        name: "Gamemode",
        alias: "gamemode",
    },
    ModeEntry {
        mode: SearchMode::ServerId,
        name: "ServerId",
        alias: "server id",
    },
    ModeEntry {
        mode: SearchMode::Guid,
        name: "Guid",
        alias: "guid",
    },
    ModeEntry {
        mode: SearchMode::PlayerIcName,
        name: "PlayerIcName",
        alias: "player ic name",
    },
    ModeEntry {
        mode: SearchMode::PlayerOocName,
        name: "PlayerOocName",
        alias: "player ooc name",
    },
    ModeEntry {
        mode: SearchMode::RoundEndText,
        name: "RoundEndText",
        alias: "round end text",
    },
    ModeEntry {
        mode: SearchMode::ServerName,
        name: "ServerName",
        alias: "server name",
    },
    ModeEntry {
        mode: SearchMode::RoundId,
        name: "RoundId",
        alias: "round id",
    },
];

/// Returned when a raw string matches no mode by name, ordinal or alias.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The search mode '{attempted}' is not valid. Valid search modes are: {}", .valid.join(", "))]
pub struct InvalidModeError {
    pub attempted: String,
    pub valid: Vec<&'static str>,
}

impl SearchMode {
    pub const ALL: [Self; 9] = [
        Self::Map,
        Self::Gamemode,
        Self::ServerId,
        Self::Guid,
        Self::PlayerIcName,
        Self::PlayerOocName,
        Self::RoundEndText,
        Self::ServerName,
        Self::RoundId,
    ];

    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        MODES[self.ordinal()].name
    }

    /// Natural-language form of the canonical name, lower case.
    #[must_use]
    pub const fn humanized(self) -> &'static str {
        MODES[self.ordinal()].alias
    }

    #[must_use]
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| MODES.get(i))
            .map(|entry| entry.mode)
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        MODES.iter().map(|entry| entry.name).collect()
    }

    /// Modes whose query names a single player, which must respect that
    /// player's privacy setting before any replay is looked up.
    #[must_use]
    pub const fn is_identity_keyed(self) -> bool {
        matches!(self, Self::Guid | Self::PlayerOocName)
    }

    /// Resolves a raw client string. Matching is case-insensitive throughout.
    pub fn resolve(raw: &str) -> Result<Self, InvalidModeError> {
        let trimmed = raw.trim();

        if let Some(entry) = MODES
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(trimmed))
        {
            return Ok(entry.mode);
        }

        if let Ok(ordinal) = trimmed.parse::<i64>()
            && let Some(mode) = Self::from_ordinal(ordinal)
        {
            return Ok(mode);
        }

        let humanized = humanize(trimmed);
        if let Some(entry) = MODES
            .iter()
            .find(|entry| entry.alias.eq_ignore_ascii_case(&humanized))
        {
            return Ok(entry.mode);
        }

        Err(InvalidModeError {
            attempted: raw.to_string(),
            valid: Self::names(),
        })
    }
}

/// Turns an identifier-style token (`PlayerIcName`, `player_ic_name`,
/// `player-ic-name`) into space separated lower case words.
#[must_use]
pub fn humanize(raw: &str) -> String {
    raw.to_snake_case().replace('_', " ")
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}
