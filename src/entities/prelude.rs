pub use super::accounts::Entity as Accounts;
pub use super::history_entries::Entity as HistoryEntries;
pub use super::players::Entity as Players;
pub use super::replays::Entity as Replays;
