use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use survey_core::model::{PersistedRow, SessionId};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict: rows for this session were already stored")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store rejected the insert (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Append-only sink for finished survey rows.
///
/// `insert_batch` is at-most-once and not idempotent: calling it twice with
/// the same rows may store them twice (or fail with `Conflict` where the
/// backend enforces uniqueness). Callers must not retry blindly.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Persist every row in one batch, returning how many were written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch cannot be stored.
    async fn insert_batch(&self, rows: &[PersistedRow]) -> Result<usize, StorageError>;

    /// Short name for logs and status messages.
    fn backend(&self) -> &'static str;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryResponseStore {
    rows: Arc<Mutex<Vec<PersistedRow>>>,
}

impl InMemoryResponseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn rows(&self) -> Result<Vec<PersistedRow>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    /// Rows stored for a single session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn rows_for_session(&self, id: SessionId) -> Result<Vec<PersistedRow>, StorageError> {
        Ok(self
            .rows()?
            .into_iter()
            .filter(|row| row.session_id == id)
            .collect())
    }
}

#[async_trait]
impl ResponseStore for InMemoryResponseStore {
    async fn insert_batch(&self, rows: &[PersistedRow]) -> Result<usize, StorageError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.extend_from_slice(rows);
        Ok(rows.len())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Wraps the configured response sink behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub responses: Arc<dyn ResponseStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryResponseStore::new()))
    }

    #[must_use]
    pub fn with_store(responses: Arc<dyn ResponseStore>) -> Self {
        Self { responses }
    }
}
