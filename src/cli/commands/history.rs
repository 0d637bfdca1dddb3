use uuid::Uuid;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_history(config: &Config, account: Option<Uuid>, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let found = match account {
        Some(guid) => store.get_account(guid).await?,
        None => store.get_system_account().await?,
    };

    let Some(account) = found else {
        println!("Account not found.");
        return Ok(());
    };

    let entries = store.get_history(account.id, limit).await?;

    if entries.is_empty() {
        println!("No history for {}.", account.username);
        return Ok(());
    }

    println!("History for {} (last {}):", account.username, entries.len());
    println!("{:-<70}", "");

    for entry in entries {
        println!("• {} at {}", entry.action, entry.time);
        if let Some(details) = entry.details {
            println!("  {details}");
        }
    }

    Ok(())
}
