//! Repository port for published workflow versions.

use crate::workflow::domain::{WorkflowDefinition, WorkflowId, WorkflowVersion};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow repository operations.
pub type WorkflowRepositoryResult<T> = Result<T, WorkflowRepositoryError>;

/// Storage contract for immutable workflow versions.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Stores a newly published version.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateVersion`] when the version
    /// already exists. Stored versions are never overwritten.
    async fn store_version(&self, definition: &WorkflowDefinition) -> WorkflowRepositoryResult<()>;

    /// Finds one specific version.
    ///
    /// Returns `None` when the workflow or version does not exist.
    async fn find_version(
        &self,
        workflow_id: WorkflowId,
        version: WorkflowVersion,
    ) -> WorkflowRepositoryResult<Option<WorkflowDefinition>>;

    /// Finds the highest published version.
    ///
    /// Returns `None` when the workflow has never been published.
    async fn latest_version(
        &self,
        workflow_id: WorkflowId,
    ) -> WorkflowRepositoryResult<Option<WorkflowDefinition>>;
}

/// Errors returned by workflow repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowRepositoryError {
    /// The version is already stored.
    #[error("workflow {workflow_id} {version} already exists")]
    DuplicateVersion {
        /// The workflow.
        workflow_id: WorkflowId,
        /// The conflicting version.
        version: WorkflowVersion,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
