//! Volatile, process-local record storage.
//!
//! [`MemoryStore`] keeps records in insertion order behind an async read/write
//! lock. Every read-modify-write sequence (id assignment plus append, filter on
//! delete) runs under a single write guard so concurrent handlers cannot hand out
//! the same id twice.

use thiserror::Error;
use tokio::sync::RwLock;

/// A record with a store-assigned numeric identifier.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> u32;
}

/// Errors raised by a storage backend.
///
/// The in-memory backend never fails; the variant exists for backends that can.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not complete the operation.
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Insertion-ordered list of records guarded by a read/write lock.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a store pre-populated with `records`, kept in the given order.
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Returns a snapshot of every record in insertion order.
    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn find(&self, id: u32) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Returns the records matching `predicate`, in insertion order.
    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Appends the record built by `build` from the next free id and returns it.
    ///
    /// The id handed to `build` is `max(existing ids) + 1`, or 1 for an empty store.
    pub async fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(u32) -> T,
    {
        let mut records = self.records.write().await;
        let record = build(next_id(&records));
        records.push(record.clone());
        record
    }

    /// Applies `change` to the record with `id` and returns the updated copy.
    pub async fn modify<F>(&self, id: u32, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|record| record.id() == id)?;
        change(record);
        Some(record.clone())
    }

    /// Removes the record with `id`. Returns `false` when no such record existed.
    pub async fn remove(&self, id: u32) -> bool {
        let mut records = self.records.write().await;
        let previous_len = records.len();
        records.retain(|record| record.id() != id);
        records.len() != previous_len
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn next_id<T: Record>(records: &[T]) -> u32 {
    records.iter().map(Record::id).max().unwrap_or(0) + 1
}
