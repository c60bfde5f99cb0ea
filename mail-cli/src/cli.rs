//! CLI parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mail_storage::RowId;

#[derive(Parser)]
#[command(name = "mailstore")]
#[command(about = "Captured-mail archive CLI: count, list, search, show, store, delete", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database URL or path; overrides DATABASE_URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    /// Message table; overrides MESSAGE_TABLE.
    #[arg(long, global = true)]
    pub table: Option<String>,
    /// Also append logs to LOG_FILE.
    #[arg(long, global = true)]
    pub log_to_file: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the number of stored messages.
    Count,
    /// List messages in insertion order.
    List {
        #[arg(short, long, default_value = "0")]
        offset: usize,
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Print full messages as JSON instead of a summary table.
        #[arg(long)]
        json: bool,
    },
    /// Search by recipient (`to`), sender (`from`) or body (anything else).
    Search {
        kind: String,
        query: String,
        #[arg(short, long, default_value = "0")]
        offset: usize,
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Print one message, looked up by its message id.
    Show { id: String },
    /// Print one message, looked up by the row id `store` printed.
    ShowRow { row: RowId },
    /// Store a raw message read from a file.
    Store {
        #[arg(long)]
        from: String,
        #[arg(long, required = true)]
        to: Vec<String>,
        #[arg(long, default_value = "localhost")]
        helo: String,
        /// Host part of the generated message id.
        #[arg(long, default_value = "mailstore.local")]
        hostname: String,
        file: PathBuf,
    },
    /// Delete every message with the given message id.
    Delete { id: String },
    /// Delete all messages.
    DeleteAll {
        /// Required; guards against accidental wipes.
        #[arg(long)]
        yes: bool,
    },
}
