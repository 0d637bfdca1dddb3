use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ReplayId;
use crate::entities::{players, replays};

/// A recorded game round together with its round-end player list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub id: ReplayId,
    pub link: String,
    pub map: String,
    pub gamemode: String,
    pub server_id: String,
    pub server_name: Option<String>,
    pub round_id: Option<i32>,
    /// Absent dates order as the earliest possible value.
    pub date: Option<DateTime<Utc>>,
    pub duration: String,
    pub round_end_text: Option<String>,
    pub round_end_players: Vec<Participant>,
}

/// A player listed at round end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub player_guid: String,
    pub player_ic_name: String,
    pub player_ooc_name: String,
    pub job: Option<String>,
    pub antag: bool,
}

impl Participant {
    /// Blanks every field that identifies the person behind the character.
    pub fn redact_information(&mut self) {
        self.player_guid = uuid::Uuid::nil().to_string();
        self.player_ic_name.clear();
        self.player_ooc_name.clear();
    }
}

impl Replay {
    #[must_use]
    pub fn from_models(replay: replays::Model, players: Vec<players::Model>) -> Self {
        Self {
            id: ReplayId::new(replay.id),
            link: replay.link,
            map: replay.map,
            gamemode: replay.gamemode,
            server_id: replay.server_id,
            server_name: replay.server_name,
            round_id: replay.round_id,
            date: replay.date,
            duration: replay.duration,
            round_end_text: replay.round_end_text,
            round_end_players: players.into_iter().map(Participant::from).collect(),
        }
    }
}

impl From<players::Model> for Participant {
    fn from(model: players::Model) -> Self {
        Self {
            player_guid: model.player_guid,
            player_ic_name: model.player_ic_name,
            player_ooc_name: model.player_ooc_name,
            job: model.job,
            antag: model.antag,
        }
    }
}

/// Input for inserting a replay into the store.
#[derive(Debug, Clone, Default)]
pub struct NewReplay {
    pub link: String,
    pub map: String,
    pub gamemode: String,
    pub server_id: String,
    pub server_name: Option<String>,
    pub round_id: Option<i32>,
    pub date: Option<DateTime<Utc>>,
    pub duration: String,
    pub round_end_text: Option<String>,
    pub players: Vec<NewParticipant>,
}

#[derive(Debug, Clone, Default)]
pub struct NewParticipant {
    pub player_guid: String,
    pub player_ic_name: String,
    pub player_ooc_name: String,
    pub job: Option<String>,
    pub antag: bool,
}
