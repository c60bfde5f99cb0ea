//! Store configuration: where the database lives, which table holds messages, pool sizing.

use std::time::Duration;

use crate::error::StorageError;

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Configuration owned by one store instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `sqlite://path/to/file.db`, `sqlite::memory:`, or a plain file path.
    pub database_url: String,
    /// Table holding the message documents; must be a plain SQL identifier.
    pub table: String,
    /// Pool size for file databases. In-memory databases always use one connection.
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: IN_MEMORY_URL.to_string(),
            table: "messages".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// A private in-memory database; gone once the store is dropped.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// True for `:memory:` (with or without the `sqlite:` scheme) and `mode=memory` URLs.
    pub fn is_in_memory(&self) -> bool {
        let url = self.database_url.trim();
        let rest = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        let (database, params) = rest.split_once('?').unwrap_or((rest, ""));
        database == ":memory:" || params.split('&').any(|p| p == "mode=memory")
    }

    /// The table name is interpolated into every statement, so only identifiers made of
    /// ASCII letters, digits and `_` (not starting with a digit, not `sqlite_`-prefixed)
    /// are accepted.
    pub fn validate(&self) -> Result<(), StorageError> {
        let table = self.table.as_str();
        let mut chars = table.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        let reserved = table.to_ascii_lowercase().starts_with("sqlite_");

        if !valid_start || !valid_rest || reserved {
            return Err(StorageError::InvalidTableName(self.table.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_in_memory_messages_table() {
        let config = StoreConfig::default();
        assert!(config.is_in_memory());
        assert_eq!(config.table, "messages");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(StoreConfig::new(":memory:").is_in_memory());
        assert!(StoreConfig::new("sqlite://:memory:").is_in_memory());
        assert!(StoreConfig::new("sqlite://shared.db?mode=memory&cache=shared").is_in_memory());
        assert!(!StoreConfig::new("sqlite://./mail.db").is_in_memory());
        assert!(!StoreConfig::new("/var/lib/mail/mail.db").is_in_memory());
    }

    #[test]
    fn test_table_name_validation() {
        assert!(StoreConfig::default().with_table("messages_2024").validate().is_ok());
        assert!(StoreConfig::default().with_table("_archive").validate().is_ok());

        for bad in ["", "1messages", "messages; DROP TABLE x", "mail-box", "sqlite_master"] {
            assert!(
                matches!(
                    StoreConfig::default().with_table(bad).validate(),
                    Err(StorageError::InvalidTableName(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
