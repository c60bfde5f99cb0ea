//! Storage error types.
//!
//! Returned by [`crate::MessageStore`] operations; none of them are retried by the store.

use thiserror::Error;

use crate::models::RowId;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to initialize message store: {0}")]
    Initialization(#[source] sqlx::Error),
    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),
    #[error("Failed to serialize message: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),
    #[error("Failed to decode message in row {row_id}: {source}")]
    Decode {
        row_id: RowId,
        #[source]
        source: serde_json::Error,
    },
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
