//! Error types for task domain validation and updates.

use super::{SubtaskId, TaskId};
use crate::workflow::domain::StatusId;
use thiserror::Error;

/// Errors returned while constructing or updating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The priority name is not recognised.
    #[error("unknown task priority: {0}")]
    UnknownPriority(String),

    /// A configured value does not fit the target field.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidFieldValue {
        /// Canonical field name.
        field: &'static str,
        /// Description of the mismatch.
        reason: String,
    },

    /// The subtask does not belong to the task.
    #[error("task {task_id} has no subtask {subtask_id}")]
    SubtaskNotFound {
        /// The parent task.
        task_id: TaskId,
        /// The missing subtask.
        subtask_id: SubtaskId,
    },

    /// The task is no longer in the status the caller expected.
    #[error("task {task_id} is in status {actual}, expected {expected}")]
    StaleStatus {
        /// The task whose status moved.
        task_id: TaskId,
        /// The status the caller observed.
        expected: StatusId,
        /// The status the task actually holds.
        actual: StatusId,
    },
}
