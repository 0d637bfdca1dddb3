use super::{open_service, print_replay_summary};
use crate::config::Config;
use crate::services::{ReplayService, SearchError, SearchRequest};

pub async fn cmd_search(config: &Config, request: SearchRequest, json: bool) -> anyhow::Result<()> {
    let service = open_service(config).await?;

    let result = match service.search(request).await {
        Ok(result) => result,
        Err(e @ (SearchError::InvalidMode(_)
        | SearchError::EmptyQuery
        | SearchError::NegativePage(_)
        | SearchError::PrivateProfile)) => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.total_replays == 0 {
        println!("No replays found for {} '{}'", result.search_mode, result.query);
        return Ok(());
    }

    println!(
        "{} replays for {} '{}' (page {}/{}{})",
        result.total_replays,
        result.search_mode,
        result.query,
        result.current_page + 1,
        result.page_count.max(1),
        if result.is_cache { ", cached" } else { "" }
    );
    println!("{:-<70}", "");

    if result.replays.is_empty() {
        println!("This page is empty.");
    }

    for replay in &result.replays {
        print_replay_summary(replay);
    }

    Ok(())
}
