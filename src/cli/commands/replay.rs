use uuid::Uuid;

use super::{open_service, print_replay_summary};
use crate::config::Config;
use crate::domain::ReplayId;
use crate::services::{ReplayService, SearchError};

pub async fn cmd_replay(config: &Config, id: i32, viewer: Option<Uuid>) -> anyhow::Result<()> {
    let service = open_service(config).await?;

    let replay = match service.get_replay(ReplayId::new(id), viewer).await {
        Ok(replay) => replay,
        Err(SearchError::NotFound(id)) => {
            println!("Replay {id} not found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_replay_summary(&replay);
    println!("  Link: {}", replay.link);
    if let Some(text) = replay.round_end_text.as_deref().filter(|t| !t.is_empty()) {
        println!();
        println!("{text}");
    }

    println!();
    println!("Round end players:");
    for player in &replay.round_end_players {
        let name = if player.player_ooc_name.is_empty() {
            "[redacted]"
        } else {
            player.player_ooc_name.as_str()
        };
        let job = player.job.as_deref().unwrap_or("Unknown");
        let antag = if player.antag { " (antag)" } else { "" };
        println!("  • {} as {} - {}{}", name, player.player_ic_name, job, antag);
    }

    Ok(())
}
