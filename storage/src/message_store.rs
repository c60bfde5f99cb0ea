//! Message store: captured messages as JSON documents in one SQLite table.
//!
//! Uses SqlitePoolManager for connections and `query::Statements` for SQL text.
//! Every operation is a single autocommit statement except `search`, which runs a page
//! query and then a count query over the same predicate.

use std::sync::Arc;

use async_trait::async_trait;
use mail_core::{Message, MessageId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::error::StorageError;
use crate::models::{RowId, SearchKind, SearchPage};
use crate::query::{contains_pattern, Statements};
use crate::repository::MessageStore;
use crate::sqlite_pool::SqlitePoolManager;

/// Returned by [`MessageStore::count`] when the count query fails.
pub const COUNT_UNAVAILABLE: i64 = -1;

#[derive(Clone)]
pub struct SqliteMessageStore {
    pool_manager: SqlitePoolManager,
    statements: Arc<Statements>,
    config: Arc<StoreConfig>,
}

impl SqliteMessageStore {
    /// Opens the database and creates the message table if it does not exist.
    ///
    /// Any failure here leaves no usable store.
    pub async fn new(config: &StoreConfig) -> Result<Self, StorageError> {
        config.validate()?;

        let pool_manager = SqlitePoolManager::new(config).await.map_err(|e| {
            error!(database_url = %config.database_url, error = %e, "Failed to open database");
            StorageError::Initialization(e)
        })?;

        let store = Self {
            pool_manager,
            statements: Arc::new(Statements::new(&config.table)),
            config: Arc::new(config.clone()),
        };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(&self.statements.create_table)
            .execute(self.pool())
            .await
            .map_err(|e| {
                error!(table = %self.config.table, error = %e, "Failed creating table");
                StorageError::Initialization(e)
            })?;

        info!(table = %self.config.table, "Message table ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool_manager.pool()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Closes every pooled connection. An in-memory database is discarded.
    pub async fn close(&self) {
        self.pool().close().await;
    }

    /// Number of stored messages, as an error instead of a sentinel.
    pub async fn try_count(&self) -> Result<u64, StorageError> {
        let (count,): (i64,) = sqlx::query_as(&self.statements.count)
            .fetch_one(self.pool())
            .await
            .map_err(query_failed("count"))?;
        Ok(count.max(0) as u64)
    }

    /// The message stored under `row_id`, the value `store` returned for it.
    pub async fn load_by_row(&self, row_id: RowId) -> Result<Message, StorageError> {
        let row = sqlx::query(&self.statements.load_by_row)
            .bind(row_id.get())
            .fetch_optional(self.pool())
            .await
            .map_err(query_failed("load_by_row"))?
            .ok_or_else(|| StorageError::NotFound(format!("row {row_id}")))?;

        decode_row(&row).map(|(_, message)| message).map_err(|e| {
            error!(%row_id, error = %e, "Error loading message");
            e
        })
    }

    /// Deletes the row `row_id`; returns whether a row was removed.
    pub async fn delete_by_row(&self, row_id: RowId) -> Result<bool, StorageError> {
        let result = sqlx::query(&self.statements.delete_by_row)
            .bind(row_id.get())
            .execute(self.pool())
            .await
            .map_err(query_failed("delete_by_row"))?;

        info!(%row_id, deleted = result.rows_affected(), "Deleted message row");
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn store(&self, message: &Message) -> Result<RowId, StorageError> {
        let document = serde_json::to_string(message).map_err(|e| {
            error!(message_id = %message.id, error = %e, "Error converting message to json");
            StorageError::Serialization(e)
        })?;

        let result = sqlx::query(&self.statements.insert)
            .bind(document)
            .execute(self.pool())
            .await
            .map_err(query_failed("store"))?;

        let row_id = RowId::new(result.last_insert_rowid());
        debug!(%row_id, message_id = %message.id, "Stored message");
        Ok(row_id)
    }

    async fn count(&self) -> i64 {
        match self.try_count().await {
            Ok(count) => i64::try_from(count).unwrap_or(i64::MAX),
            Err(_) => COUNT_UNAVAILABLE,
        }
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Message>, StorageError> {
        let rows = sqlx::query(&self.statements.list)
            .bind(sql_int(limit))
            .bind(sql_int(offset))
            .fetch_all(self.pool())
            .await
            .map_err(query_failed("list"))?;

        let messages: Vec<Message> = decode_rows(rows).collect();
        debug!(offset, limit, returned = messages.len(), "Listed messages");
        Ok(messages)
    }

    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage, StorageError> {
        let pattern = contains_pattern(query);
        info!(?kind, query, offset, limit, "Searching messages");

        let page_sql = self.statements.search_page(kind);
        let rows = sqlx::query(&page_sql)
            .bind(pattern.as_str())
            .bind(sql_int(limit))
            .bind(sql_int(offset))
            .fetch_all(self.pool())
            .await
            .map_err(query_failed("search"))?;
        let messages: Vec<Message> = decode_rows(rows).collect();

        // Not atomic with the page query; concurrent writes can make the two disagree.
        let count_sql = self.statements.search_count(kind);
        let total = sqlx::query_as::<_, (i64,)>(&count_sql)
            .bind(pattern.as_str())
            .fetch_one(self.pool())
            .await
            .map(|(count,)| count.max(0) as u64)
            .map_err(query_failed("search count"));

        Ok(SearchPage { messages, total })
    }

    async fn load(&self, id: &MessageId) -> Result<Message, StorageError> {
        let row = sqlx::query(&self.statements.load)
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(query_failed("load"))?;

        let Some(row) = row else {
            debug!(message_id = %id, "Message not found");
            return Err(StorageError::NotFound(id.to_string()));
        };

        decode_row(&row).map(|(_, message)| message).map_err(|e| {
            error!(message_id = %id, error = %e, "Error loading message");
            e
        })
    }

    async fn delete_one(&self, id: &MessageId) -> Result<(), StorageError> {
        let result = sqlx::query(&self.statements.delete_one)
            .bind(id.as_str())
            .execute(self.pool())
            .await
            .map_err(query_failed("delete_one"))?;

        info!(message_id = %id, deleted = result.rows_affected(), "Deleted message");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        let result = sqlx::query(&self.statements.delete_all)
            .execute(self.pool())
            .await
            .map_err(query_failed("delete_all"))?;

        info!(deleted = result.rows_affected(), "Deleted all messages");
        Ok(())
    }
}

fn query_failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |e| {
        error!(operation, error = %e, "Message store query failed");
        StorageError::Persistence(e)
    }
}

/// SQLite integers are signed; pagination values past `i64::MAX` saturate.
fn sql_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn decode_row(row: &SqliteRow) -> Result<(RowId, Message), StorageError> {
    let row_id = RowId::new(row.try_get("id")?);
    let document: String = row.try_get("message")?;
    let message = serde_json::from_str(&document)
        .map_err(|source| StorageError::Decode { row_id, source })?;
    Ok((row_id, message))
}

/// Lazily decodes rows in order, dropping each row whose document does not decode.
/// A corrupt row is logged and skipped so it cannot hide the rest of the archive.
fn decode_rows(rows: Vec<SqliteRow>) -> impl Iterator<Item = Message> {
    rows.into_iter().filter_map(|row| match decode_row(&row) {
        Ok((_, message)) => Some(message),
        Err(e) => {
            warn!(error = %e, "Skipping undecodable message row");
            None
        }
    })
}
