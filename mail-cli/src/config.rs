//! CLI config: database location, table, pool sizing, log file. Loaded from env.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use mail_storage::StoreConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// DATABASE_URL
    pub database_url: String,
    /// MESSAGE_TABLE
    pub table: String,
    /// DB_MAX_CONNECTIONS
    pub max_connections: u32,
    /// DB_BUSY_TIMEOUT_SECS
    pub busy_timeout_secs: u64,
    /// LOG_FILE
    pub log_file: String,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} is not valid: {value:?}")),
        Err(_) => Ok(default),
    }
}

impl CliConfig {
    /// Load from environment variables; call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn load() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./mailstore.db".to_string());
        let table = env::var("MESSAGE_TABLE").unwrap_or_else(|_| "messages".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/mailstore.log".to_string());
        let max_connections = parse_var("DB_MAX_CONNECTIONS", 5)?;
        let busy_timeout_secs = parse_var("DB_BUSY_TIMEOUT_SECS", 5)?;

        Ok(Self {
            database_url,
            table,
            max_connections,
            busy_timeout_secs,
            log_file,
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, database_url: Option<String>, table: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(table) = table {
            self.table = table;
        }
        self
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.database_url.clone())
            .with_table(self.table.clone())
            .with_max_connections(self.max_connections)
            .with_busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "DATABASE_URL",
        "MESSAGE_TABLE",
        "DB_MAX_CONNECTIONS",
        "DB_BUSY_TIMEOUT_SECS",
        "LOG_FILE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();

        let config = CliConfig::load().unwrap();

        assert_eq!(config.database_url, "sqlite://./mailstore.db");
        assert_eq!(config.table, "messages");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout_secs, 5);
        assert_eq!(config.log_file, "logs/mailstore.log");
    }

    #[test]
    #[serial]
    fn test_load_config_with_custom_values() {
        clear_env();
        env::set_var("DATABASE_URL", "sqlite::memory:");
        env::set_var("MESSAGE_TABLE", "captured");
        env::set_var("DB_MAX_CONNECTIONS", "8");
        env::set_var("DB_BUSY_TIMEOUT_SECS", "30");
        env::set_var("LOG_FILE", "/tmp/mail.log");

        let config = CliConfig::load().unwrap();
        let store = config.store_config();

        assert_eq!(store.database_url, "sqlite::memory:");
        assert_eq!(store.table, "captured");
        assert_eq!(store.max_connections, 8);
        assert_eq!(store.busy_timeout, Duration::from_secs(30));
        assert_eq!(config.log_file, "/tmp/mail.log");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_an_error() {
        clear_env();
        env::set_var("DB_MAX_CONNECTIONS", "many");

        let err = CliConfig::load().unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_win_over_env() {
        clear_env();
        env::set_var("MESSAGE_TABLE", "from_env");

        let config = CliConfig::load()
            .unwrap()
            .with_overrides(Some("sqlite://other.db".to_string()), Some("from_flag".to_string()));

        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.table, "from_flag");

        clear_env();
    }
}
