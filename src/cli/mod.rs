//! CLI module - Command-line interface for the replay browser
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Replay Browser - search recorded game rounds
#[derive(Parser)]
#[command(name = "replay-browser")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Search replays
    #[command(alias = "s")]
    Search {
        /// Search mode: name, ordinal or alias (see `modes`)
        mode: String,
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Page to show, starting at 0
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        page: i64,
        /// Search on behalf of this account GUID
        #[arg(long)]
        viewer: Option<Uuid>,
        /// Print the result page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single replay
    #[command(alias = "r")]
    Replay {
        /// Replay ID
        id: i32,
        /// View on behalf of this account GUID
        #[arg(long)]
        viewer: Option<Uuid>,
    },

    /// Show the most recent replays
    Recent {
        /// View on behalf of this account GUID
        #[arg(long)]
        viewer: Option<Uuid>,
    },

    /// List the available search modes
    Modes,

    /// Show recorded history for an account
    #[command(alias = "h")]
    History {
        /// Account GUID, the system account when omitted
        account: Option<Uuid>,
        /// Number of entries to show
        #[arg(long, default_value_t = crate::constants::history::DEFAULT_LIST_LIMIT)]
        limit: u64,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
