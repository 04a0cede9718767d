//! In-memory workflow repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::workflow::{
    domain::{WorkflowDefinition, WorkflowId, WorkflowVersion},
    ports::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult},
};

/// Thread-safe in-memory store of published workflow versions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowRepository {
    versions: Arc<RwLock<BTreeMap<(WorkflowId, WorkflowVersion), WorkflowDefinition>>>,
}

impl InMemoryWorkflowRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> WorkflowRepositoryError {
    WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn store_version(&self, definition: &WorkflowDefinition) -> WorkflowRepositoryResult<()> {
        let mut versions = self.versions.write().map_err(lock_error)?;
        let key = (definition.id(), definition.version());
        if versions.contains_key(&key) {
            return Err(WorkflowRepositoryError::DuplicateVersion {
                workflow_id: definition.id(),
                version: definition.version(),
            });
        }
        versions.insert(key, definition.clone());
        Ok(())
    }

    async fn find_version(
        &self,
        workflow_id: WorkflowId,
        version: WorkflowVersion,
    ) -> WorkflowRepositoryResult<Option<WorkflowDefinition>> {
        let versions = self.versions.read().map_err(lock_error)?;
        Ok(versions.get(&(workflow_id, version)).cloned())
    }

    async fn latest_version(
        &self,
        workflow_id: WorkflowId,
    ) -> WorkflowRepositoryResult<Option<WorkflowDefinition>> {
        let versions = self.versions.read().map_err(lock_error)?;
        Ok(versions
            .iter()
            .filter(|((id, _), _)| *id == workflow_id)
            .map(|(_, definition)| definition)
            .next_back()
            .cloned())
    }
}
