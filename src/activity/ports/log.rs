//! Append-only activity log port.

use crate::activity::domain::ActivityRecord;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for activity log operations.
pub type ActivityLogResult<T> = Result<T, ActivityLogError>;

/// Append-only sink for transition history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Appends one record.
    async fn append(&self, record: &ActivityRecord) -> ActivityLogResult<()>;

    /// Returns up to `limit` records for a task, most recent first.
    async fn recent_for_task(
        &self,
        task_id: TaskId,
        limit: usize,
    ) -> ActivityLogResult<Vec<ActivityRecord>>;
}

/// Errors returned by activity log implementations.
#[derive(Debug, Clone, Error)]
pub enum ActivityLogError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
