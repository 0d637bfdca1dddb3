pub mod prelude;

pub mod accounts;
pub mod history_entries;
pub mod players;
pub mod replays;
