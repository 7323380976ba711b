//! Persisted-storage collaborator.
//!
//! The engine does not specify the storage medium (local browser storage,
//! a JSON file, an in-memory table); it only requires the operations in
//! [`TaskStorage`]. The store's `fetch` maps to [`TaskStorage::load_all`],
//! and every record mutation, creation, and deletion maps to a
//! corresponding write.
//!
//! # Authority
//!
//! In-memory state is the authority; storage is a write-behind cache of
//! it. A failed write is surfaced as a recoverable [`StorageError`] to the
//! caller of the mutating operation, but it never rolls back the in-memory
//! mutation and never suppresses the change notification.

use crate::task::{TaskData, TaskId};
use thiserror::Error;

/// Errors surfaced by storage operations and rejected record mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The storage medium is disabled or unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The storage medium refused the write for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// A write for one record failed.
    #[error("write failed for task {id}: {reason}")]
    WriteFailed {
        /// The record whose write failed.
        id: TaskId,
        /// The reason for failure.
        reason: String,
    },

    /// A delete for one record failed.
    #[error("delete failed for task {id}: {reason}")]
    DeleteFailed {
        /// The record whose delete failed.
        id: TaskId,
        /// The reason for failure.
        reason: String,
    },

    /// A bulk load failed.
    #[error("load failed: {0}")]
    LoadFailed(String),

    /// Persisted data could not be decoded.
    #[error("corrupt persisted data: {0}")]
    Corrupt(String),

    /// A mutation was attempted on a record that has already been
    /// destroyed. The mutation is not applied and nothing is emitted.
    #[error("task {0} has been destroyed")]
    RecordDestroyed(TaskId),
}

/// Trait for persisted-storage implementations.
///
/// Implementations are synchronous and local; the engine's execution
/// model has no blocking I/O in mind and calls these from within event
/// handlers. Slow media belong behind a buffering adapter.
///
/// # Examples
///
/// ```rust,ignore
/// // Bulk-load at startup (store.fetch):
/// let tasks = storage.load_all()?;
///
/// // Write-behind on every mutation:
/// storage.put(&record_snapshot)?;
/// storage.delete(id)?;
/// ```
pub trait TaskStorage {
    /// Load every persisted record.
    ///
    /// Order is not significant; the store re-sorts by insertion rank.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::LoadFailed`] or [`StorageError::Corrupt`]
    /// if the persisted data cannot be read or decoded. The store leaves
    /// its membership untouched in that case.
    fn load_all(&self) -> Result<Vec<TaskData>, StorageError>;

    /// Create or update one record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`], [`StorageError::QuotaExceeded`]
    /// or [`StorageError::Unavailable`] when the write cannot be applied.
    fn put(&self, task: &TaskData) -> Result<(), StorageError>;

    /// Remove one record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DeleteFailed`] or
    /// [`StorageError::Unavailable`] when the delete cannot be applied.
    fn delete(&self, id: TaskId) -> Result<(), StorageError>;

    /// Replace the persisted set wholesale.
    ///
    /// # Errors
    ///
    /// Returns a write-side [`StorageError`] when the snapshot cannot be
    /// persisted.
    fn save_all(&self, tasks: &[TaskData]) -> Result<(), StorageError>;
}
