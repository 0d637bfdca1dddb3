//! Per-viewer redaction of round end players.
//!
//! Runs after cache retrieval on a copy of each replay, so cached results stay
//! unredacted and every viewer gets their own view.

use std::collections::HashMap;

use crate::domain::Viewer;
use crate::models::{Account, Replay};

/// Accounts of the players appearing in a batch of replays, keyed by
/// lowercase GUID.
#[derive(Debug, Default)]
pub struct PlayerAccounts {
    by_guid: HashMap<String, Account>,
}

impl PlayerAccounts {
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            by_guid: accounts
                .into_iter()
                .map(|account| (account.guid.to_lowercase(), account))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, player_guid: &str) -> Option<&Account> {
        self.by_guid.get(&player_guid.to_lowercase())
    }

    /// Distinct lowercase GUIDs of every player in `replays`.
    #[must_use]
    pub fn guids_of(replays: &[Replay]) -> Vec<String> {
        let mut guids: Vec<String> = replays
            .iter()
            .flat_map(|replay| &replay.round_end_players)
            .map(|player| player.player_guid.to_lowercase())
            .collect();
        guids.sort_unstable();
        guids.dedup();
        guids
    }
}

pub struct PrivacyFilter;

impl PrivacyFilter {
    /// Blanks players whose account asked for redaction, unless the viewer is
    /// that player or an admin. Players without an account are left alone.
    #[must_use]
    pub fn apply(mut replay: Replay, viewer: &Viewer, accounts: &PlayerAccounts) -> Replay {
        for player in &mut replay.round_end_players {
            let Some(account) = accounts.get(&player.player_guid) else {
                continue;
            };

            if account.redact_information && !viewer.can_see(&player.player_guid) {
                player.redact_information();
            }
        }

        replay
    }

    #[must_use]
    pub fn apply_all(replays: Vec<Replay>, viewer: &Viewer, accounts: &PlayerAccounts) -> Vec<Replay> {
        replays
            .into_iter()
            .map(|replay| Self::apply(replay, viewer, accounts))
            .collect()
    }
}
