//! Storage port for tasks, including the conditional status write.

use crate::task::domain::{Task, TaskDomainError, TaskFieldUpdate, TaskId};
use crate::workflow::domain::{LegacyStatusId, StatusId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// A workflow status change guarded by the status the caller observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Task to move.
    pub task_id: TaskId,
    /// Status the task must still hold for the write to apply.
    pub expected_status_id: StatusId,
    /// Status to move to.
    pub new_status_id: StatusId,
    /// Legacy simple status mirrored from the new status.
    pub legacy_status_id: Option<LegacyStatusId>,
    /// Timestamp recorded as the task's latest update.
    pub updated_at: DateTime<Utc>,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Atomically moves a task's workflow status if it still equals
    /// `change.expected_status_id`, returning the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist and
    /// [`TaskStoreError::StatusConflict`] when the precondition no longer
    /// holds. Implementations never retry.
    async fn compare_and_set_status(&self, change: &StatusChange) -> TaskStoreResult<Task>;

    /// Applies field updates in order, never touching workflow status, and
    /// returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist and
    /// [`TaskStoreError::Domain`] when an update is rejected; no update of the
    /// batch is applied in that case.
    async fn apply_updates(
        &self,
        id: TaskId,
        updates: &[TaskFieldUpdate],
        updated_at: DateTime<Utc>,
    ) -> TaskStoreResult<Task>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task's status changed since the caller observed it.
    #[error("task {task_id} status is {actual}, expected {expected}")]
    StatusConflict {
        /// The contended task.
        task_id: TaskId,
        /// The status the caller expected.
        expected: StatusId,
        /// The status the task holds now.
        actual: StatusId,
    },

    /// A field update was rejected by the task domain.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
