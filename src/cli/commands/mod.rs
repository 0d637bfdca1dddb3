mod history;
mod modes;
mod recent;
mod replay;
mod search;

pub use history::cmd_history;
pub use modes::cmd_modes;
pub use recent::cmd_recent;
pub use replay::cmd_replay;
pub use search::cmd_search;

use crate::config::Config;
use crate::db::Store;
use crate::models::Replay;
use crate::services::SeaOrmReplayService;

async fn open_service(config: &Config) -> anyhow::Result<SeaOrmReplayService> {
    let store = Store::new(&config.general.database_path).await?;
    Ok(SeaOrmReplayService::new(store, config.search.clone()))
}

fn print_replay_summary(replay: &Replay) {
    let date = replay
        .date
        .map_or_else(|| "unknown date".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string());
    let round = replay
        .round_id
        .map_or_else(|| "?".to_string(), |r| r.to_string());

    println!("#{} {} on {} [{}]", replay.id, replay.gamemode, replay.map, date);
    println!(
        "  Server: {} | Round: {} | Duration: {} | Players: {}",
        replay.server_name.as_deref().unwrap_or(&replay.server_id),
        round,
        replay.duration,
        replay.round_end_players.len()
    );
}
