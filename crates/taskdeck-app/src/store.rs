//! Async store contract over the canonical task record set.

use anyhow::Error;
use std::convert::Infallible;
use std::sync::Arc;
use taskdeck_core::{OwnerId, Task, TaskDraft, TaskFilter, TaskId, TaskPatch};
use taskdeck_store_mem::MemoryStore;
use tokio::sync::Mutex;

/// Async CRUD-plus-query contract for task storage.
///
/// Absence is signalled in-band (`Option`/`bool`); the associated error type
/// exists for backends with genuine I/O failure modes. The in-memory backend
/// uses [`Infallible`].
#[allow(async_fn_in_trait)]
pub trait TaskStore: Send + Sync {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error> + Send;

    /// List every record owned by `owner`. Order is implementation-defined
    /// but stable within a single call.
    ///
    /// # Errors
    /// Returns a store-specific error when the listing fails.
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, Self::Error>;

    /// Fetch a single record; `None` when the id is unknown.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    async fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error>;

    /// Store a new record with a fresh id and `created_at = updated_at = now`.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    async fn create(&self, draft: TaskDraft) -> Result<Task, Self::Error>;

    /// Merge the present patch fields onto the record and refresh
    /// `updated_at`; `None` with no side effect when the id is unknown.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>, Self::Error>;

    /// Remove a record. Returns `true` iff something was removed.
    ///
    /// # Errors
    /// Returns a store-specific error when the removal fails.
    async fn delete(&self, id: TaskId) -> Result<bool, Self::Error>;

    /// Case-insensitive substring search over title and description within
    /// `owner`'s records. An empty query matches everything.
    ///
    /// # Errors
    /// Returns a store-specific error when the query fails.
    async fn search(&self, owner: &OwnerId, query: &str) -> Result<Vec<Task>, Self::Error>;

    /// List `owner`'s records satisfying every present criterion of `filter`.
    ///
    /// # Errors
    /// Returns a store-specific error when the query fails.
    async fn filter(&self, owner: &OwnerId, filter: &TaskFilter) -> Result<Vec<Task>, Self::Error>;
}

impl TaskStore for Arc<Mutex<MemoryStore>> {
    type Error = Infallible;

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, Self::Error> {
        Ok(self.lock().await.list_by_owner(owner))
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Ok(self.lock().await.get(id))
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task, Self::Error> {
        Ok(self.lock().await.create(draft))
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>, Self::Error> {
        Ok(self.lock().await.update(id, patch))
    }

    async fn delete(&self, id: TaskId) -> Result<bool, Self::Error> {
        Ok(self.lock().await.delete(id))
    }

    async fn search(&self, owner: &OwnerId, query: &str) -> Result<Vec<Task>, Self::Error> {
        Ok(self.lock().await.search(owner, query))
    }

    async fn filter(&self, owner: &OwnerId, filter: &TaskFilter) -> Result<Vec<Task>, Self::Error> {
        Ok(self.lock().await.filter(owner, filter))
    }
}
