//! Storage crate: captured-message persistence in a single SQLite table.
//!
//! Each message is one row: an engine-assigned `id` and the message as a JSON document.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`config`] – StoreConfig (database location, table, pool sizing)
//! - [`models`] – RowId, SearchKind, SearchPage
//! - [`repository`] – MessageStore trait
//! - [`message_store`] – SqliteMessageStore
//! - [`sqlite_pool`] – SqlitePoolManager

mod config;
mod error;
mod message_store;
mod models;
mod query;
mod repository;
mod sqlite_pool;


pub use config::StoreConfig;
pub use error::StorageError;
pub use message_store::{SqliteMessageStore, COUNT_UNAVAILABLE};
pub use models::{RowId, SearchKind, SearchPage};
pub use repository::MessageStore;
pub use sqlite_pool::SqlitePoolManager;
