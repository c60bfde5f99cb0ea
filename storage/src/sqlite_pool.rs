//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::StoreConfig;

/// Manages a single SQLite pool; creates the database file if missing.
///
/// Every pooled connection runs with `case_sensitive_like` on, so `LIKE` patterns match
/// case-sensitively.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the configured database (file path, `sqlite:` URL, or in-memory).
    ///
    /// An in-memory database is pinned to one connection that is never recycled; the
    /// database lives exactly as long as the pool.
    pub async fn new(config: &StoreConfig) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", config.database_url);

        let in_memory = config.is_in_memory();
        let url = config.database_url.trim();
        let options = if in_memory && url == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else if url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(url)?
        } else {
            SqliteConnectOptions::new().filename(url)
        };

        let options = options
            .create_if_missing(true)
            .busy_timeout(config.busy_timeout)
            .pragma("case_sensitive_like", "ON");

        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await?
        };

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
