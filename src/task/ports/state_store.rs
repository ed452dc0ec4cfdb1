//! State store port for durable task records.

use crate::task::domain::{TaskId, TaskRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task state store operations.
pub type TaskStateResult<T> = Result<T, TaskStateError>;

/// Durable task record persistence contract.
///
/// Implementations guarantee that a reader observes either the previous
/// complete record or the new complete record, never a partial write.
#[async_trait]
pub trait TaskStateStore: Send + Sync {
    /// Stamps save metadata onto `record` and durably writes it.
    ///
    /// `updated_at` is set to the current time and `created_at` is set when
    /// absent, so after a successful save `record` equals what a subsequent
    /// [`Self::load`] returns.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStateError::Persistence`] when the write fails.
    async fn save(&self, record: &mut TaskRecord) -> TaskStateResult<()>;

    /// Loads a task record.
    ///
    /// Returns `None` when no record exists for `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStateError::Malformed`] when the stored record cannot be
    /// decoded and [`TaskStateError::Persistence`] on read failures.
    async fn load(&self, task_id: &TaskId) -> TaskStateResult<Option<TaskRecord>>;

    /// Returns whether a record exists for `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStateError::Persistence`] when the lookup fails.
    async fn exists(&self, task_id: &TaskId) -> TaskStateResult<bool>;

    /// Deletes the record for `task_id`; deleting an absent record succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStateError::Persistence`] when removal fails.
    async fn delete(&self, task_id: &TaskId) -> TaskStateResult<()>;

    /// Lists the identifiers of all stored records in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStateError::Persistence`] when enumeration fails.
    async fn list_tasks(&self) -> TaskStateResult<Vec<TaskId>>;
}

/// Errors returned by task state store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStateError {
    /// The stored record exists but is not a valid task record.
    #[error("malformed task record for {task_id}: {source}")]
    Malformed {
        /// Identifier of the unreadable record.
        task_id: TaskId,
        /// Decoding failure.
        source: Arc<serde_json::Error>,
    },

    /// Storage-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStateError {
    /// Wraps a storage error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a decoding error for the given record.
    #[must_use]
    pub fn malformed(task_id: TaskId, err: serde_json::Error) -> Self {
        Self::Malformed {
            task_id,
            source: Arc::new(err),
        }
    }
}
