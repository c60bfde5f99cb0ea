use async_trait::async_trait;
use mail_core::{Message, MessageId};

use crate::error::StorageError;
use crate::models::{RowId, SearchKind, SearchPage};

/// Operations the SMTP side and the admin API need from a message store.
///
/// `store` returns the engine row id, while `load` and `delete_one` look messages up by the
/// [`MessageId`] embedded in the document. The two only line up if the caller sets the
/// message id to the row id, which it cannot know before inserting; callers holding a
/// [`RowId`] use the row-id lookups of the concrete store instead.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists one message and returns its row id.
    async fn store(&self, message: &Message) -> Result<RowId, StorageError>;

    /// Number of stored messages, or a negative value when the count is unavailable.
    async fn count(&self) -> i64;

    /// Messages in insertion order, skipping `offset`, at most `limit`.
    /// Rows that fail to decode are skipped.
    async fn list(&self, offset: usize, limit: usize) -> Result<Vec<Message>, StorageError>;

    /// Messages whose `kind` field contains `query` (case-sensitive), paginated like
    /// [`MessageStore::list`], with the total match count.
    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage, StorageError>;

    /// The message whose embedded id equals `id`.
    async fn load(&self, id: &MessageId) -> Result<Message, StorageError>;

    /// Deletes every message whose embedded id equals `id`; absent ids are not an error.
    async fn delete_one(&self, id: &MessageId) -> Result<(), StorageError>;

    /// Deletes all messages, keeping the table.
    async fn delete_all(&self) -> Result<(), StorageError>;
}
