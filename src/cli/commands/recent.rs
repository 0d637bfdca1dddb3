use uuid::Uuid;

use super::{open_service, print_replay_summary};
use crate::config::Config;
use crate::services::ReplayService;

pub async fn cmd_recent(config: &Config, viewer: Option<Uuid>) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let replays = service.most_recent(viewer).await?;

    if replays.is_empty() {
        println!("No replays stored yet.");
        return Ok(());
    }

    println!("Most Recent Replays ({} shown)", replays.len());
    println!("{:-<70}", "");

    for replay in &replays {
        print_replay_summary(replay);
    }

    Ok(())
}
