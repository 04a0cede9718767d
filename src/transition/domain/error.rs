//! Error taxonomy returned by transition attempts.

use crate::access::{domain::UserId, ports::AccessLookupError};
use crate::task::{domain::TaskId, ports::TaskStoreError};
use crate::workflow::{
    domain::{
        StatusId, TransitionKey, TransitionSelector, Validator, WorkflowDomainError, WorkflowId,
        WorkflowVersion,
    },
    ports::WorkflowRepositoryError,
    services::WorkflowServiceError,
};
use std::fmt;
use thiserror::Error;

/// Result type for transition attempts.
pub type TransitionResult<T> = Result<T, TransitionError>;

/// The entity an attempt could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingEntity {
    /// The task does not exist.
    Task(TaskId),
    /// The workflow version the task is bound to does not exist.
    WorkflowVersion {
        /// The bound workflow.
        workflow_id: WorkflowId,
        /// The bound version.
        version: WorkflowVersion,
    },
    /// No transition of the bound version matches the selector.
    Transition(TransitionSelector),
    /// A transition endpoint is absent from its own version.
    Status(StatusId),
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(task_id) => write!(formatter, "task {task_id}"),
            Self::WorkflowVersion {
                workflow_id,
                version,
            } => write!(formatter, "workflow {workflow_id} {version}"),
            Self::Transition(selector) => write!(formatter, "transition {selector}"),
            Self::Status(status_id) => write!(formatter, "status {status_id}"),
        }
    }
}

/// Why a resolved transition cannot be applied to the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTransitionReason {
    /// The task is not in the transition's source status.
    StatusMismatch {
        /// The transition's source status.
        from_status_id: StatusId,
        /// The task's current status.
        current_status_id: StatusId,
    },
    /// The transition is switched off in the definition.
    Disabled,
}

impl fmt::Display for InvalidTransitionReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusMismatch {
                from_status_id,
                current_status_id,
            } => write!(
                formatter,
                "task is in status {current_status_id}, transition starts from {from_status_id}"
            ),
            Self::Disabled => formatter.write_str("transition is disabled"),
        }
    }
}

/// Errors returned by [`crate::transition::services::TransitionExecutor`].
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The task, its bound workflow version, or the transition is absent.
    #[error("{0} not found")]
    NotFound(MissingEntity),

    /// The requester fails the transition's role gate.
    #[error("user {user_id} may not perform transition '{transition}'")]
    PermissionDenied {
        /// The requester.
        user_id: UserId,
        /// The transition requested.
        transition: TransitionKey,
    },

    /// A required field or template field is empty on the task.
    #[error("required field '{field}' is missing")]
    ValidationFailed {
        /// The first missing field, in declaration order.
        field: String,
    },

    /// A structural validator rejected the task.
    #[error("validator {validator} rejected the transition: {reason}")]
    ValidatorRejected {
        /// The failing validator.
        validator: Validator,
        /// Description of the offending data.
        reason: String,
    },

    /// The transition does not apply to the task as loaded.
    #[error("transition '{transition}' cannot be applied: {reason}")]
    InvalidTransition {
        /// The transition requested.
        transition: TransitionKey,
        /// Why it does not apply.
        reason: InvalidTransitionReason,
    },

    /// The task moved between loading and the conditional write.
    #[error("task {task_id} was modified concurrently; reload and resubmit")]
    ConcurrentModification {
        /// The contended task.
        task_id: TaskId,
    },

    /// The request did not name a transition.
    #[error(transparent)]
    Request(#[from] WorkflowDomainError),

    /// Task storage failed.
    #[error(transparent)]
    Store(TaskStoreError),

    /// Workflow storage failed.
    #[error(transparent)]
    Workflow(WorkflowServiceError),

    /// A role or identity lookup failed.
    #[error(transparent)]
    Access(#[from] AccessLookupError),
}

impl TransitionError {
    /// Returns `true` when the caller can recover by reloading the task or
    /// fixing its data and resubmitting.
    ///
    /// Permission failures and missing entities are not retryable by the
    /// same requester.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed { .. }
                | Self::ValidatorRejected { .. }
                | Self::ConcurrentModification { .. }
                | Self::InvalidTransition {
                    reason: InvalidTransitionReason::StatusMismatch { .. },
                    ..
                }
        )
    }
}

impl From<TaskStoreError> for TransitionError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound(task_id) => Self::NotFound(MissingEntity::Task(task_id)),
            TaskStoreError::StatusConflict { task_id, .. } => {
                Self::ConcurrentModification { task_id }
            }
            other => Self::Store(other),
        }
    }
}

impl From<WorkflowServiceError> for TransitionError {
    fn from(err: WorkflowServiceError) -> Self {
        match err {
            WorkflowServiceError::TaskNotFound(task_id) => {
                Self::NotFound(MissingEntity::Task(task_id))
            }
            WorkflowServiceError::VersionNotFound {
                workflow_id,
                version,
            } => Self::NotFound(MissingEntity::WorkflowVersion {
                workflow_id,
                version,
            }),
            WorkflowServiceError::TransitionNotFound { selector, .. } => {
                Self::NotFound(MissingEntity::Transition(selector))
            }
            WorkflowServiceError::TaskStore(store_err) => Self::from(store_err),
            other => Self::Workflow(other),
        }
    }
}

impl From<WorkflowRepositoryError> for TransitionError {
    fn from(err: WorkflowRepositoryError) -> Self {
        Self::Workflow(WorkflowServiceError::Repository(err))
    }
}
