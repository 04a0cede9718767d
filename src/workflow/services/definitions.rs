//! Service layer for publishing workflow versions and resolving transitions.

use crate::access::domain::SpaceId;
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskStore, TaskStoreError},
};
use crate::workflow::{
    domain::{
        PublishTarget, Transition, TransitionSelector, WorkflowDefinition, WorkflowDigest,
        WorkflowDomainError, WorkflowDraft, WorkflowId, WorkflowVersion,
    },
    ports::{WorkflowRepository, WorkflowRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for publishing a workflow draft.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishWorkflowRequest {
    space_id: SpaceId,
    workflow_id: Option<WorkflowId>,
    draft: WorkflowDraft,
}

impl PublishWorkflowRequest {
    /// Creates a request that publishes `draft` as a brand-new workflow.
    #[must_use]
    pub const fn new(space_id: SpaceId, draft: WorkflowDraft) -> Self {
        Self {
            space_id,
            workflow_id: None,
            draft,
        }
    }

    /// Publishes the draft as the next version of an existing workflow.
    #[must_use]
    pub const fn for_workflow(mut self, workflow_id: WorkflowId) -> Self {
        self.workflow_id = Some(workflow_id);
        self
    }
}

/// A task together with the exact workflow version it is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    /// The task as currently stored.
    pub task: Task,
    /// The task's bound workflow version.
    pub workflow: Arc<WorkflowDefinition>,
}

impl TaskSnapshot {
    /// Resolves a transition within the task's bound version.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::TransitionNotFound`] when nothing in
    /// the bound version matches.
    pub fn resolve_transition(
        &self,
        selector: &TransitionSelector,
    ) -> WorkflowServiceResult<&Transition> {
        resolve_within(&self.workflow, selector)
    }
}

/// Service-level errors for workflow definition operations.
#[derive(Debug, Error)]
pub enum WorkflowServiceError {
    /// Draft decoding failed.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),
    /// Workflow repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkflowRepositoryError),
    /// Task store operation failed.
    #[error(transparent)]
    TaskStore(#[from] TaskStoreError),
    /// The workflow has never been published.
    #[error("workflow {0} not found")]
    WorkflowNotFound(WorkflowId),
    /// The workflow exists but not at this version.
    #[error("workflow {workflow_id} has no {version}")]
    VersionNotFound {
        /// The workflow.
        workflow_id: WorkflowId,
        /// The missing version.
        version: WorkflowVersion,
    },
    /// No transition of the version matches the selector.
    #[error("transition {selector} not found in workflow {workflow_id} {version}")]
    TransitionNotFound {
        /// The workflow.
        workflow_id: WorkflowId,
        /// The version searched.
        version: WorkflowVersion,
        /// The selector that failed to match.
        selector: TransitionSelector,
    },
    /// The task does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// A new version was requested for a workflow owned by another space.
    #[error("workflow {workflow_id} belongs to space {owner}, not {requested}")]
    SpaceMismatch {
        /// The workflow.
        workflow_id: WorkflowId,
        /// The owning space.
        owner: SpaceId,
        /// The space named in the request.
        requested: SpaceId,
    },
}

/// Result type for workflow definition service operations.
pub type WorkflowServiceResult<T> = Result<T, WorkflowServiceError>;

/// Workflow definition store: publication, version lookup, and transition
/// resolution against a task's bound version.
pub struct WorkflowDefinitionService<W, T, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    C: Clock + Send + Sync,
{
    workflows: Arc<W>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<W, T, C> Clone for WorkflowDefinitionService<W, T, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            workflows: Arc::clone(&self.workflows),
            tasks: Arc::clone(&self.tasks),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<W, T, C> WorkflowDefinitionService<W, T, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow definition service.
    #[must_use]
    pub const fn new(workflows: Arc<W>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            workflows,
            tasks,
            clock,
        }
    }

    /// Publishes a draft as the next immutable version of a workflow.
    ///
    /// A new workflow starts at version 1. Publishing a draft identical to the
    /// latest version returns that version unchanged. Tasks bound to earlier
    /// versions are never migrated.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Domain`] when the draft does not
    /// decode, [`WorkflowServiceError::SpaceMismatch`] when the workflow
    /// belongs to another space, or [`WorkflowServiceError::Repository`] when
    /// storage fails.
    pub async fn publish(
        &self,
        request: PublishWorkflowRequest,
    ) -> WorkflowServiceResult<WorkflowDefinition> {
        let workflow_id = request.workflow_id.unwrap_or_default();
        let latest = match request.workflow_id {
            Some(existing) => self.workflows.latest_version(existing).await?,
            None => None,
        };

        let version = match &latest {
            Some(current) => {
                if current.space_id() != request.space_id {
                    return Err(WorkflowServiceError::SpaceMismatch {
                        workflow_id,
                        owner: current.space_id(),
                        requested: request.space_id,
                    });
                }
                if *current.digest() == WorkflowDigest::of_draft(&request.draft)? {
                    tracing::debug!(
                        workflow_id = %workflow_id,
                        version = %current.version(),
                        "draft unchanged; reusing latest version"
                    );
                    return Ok(current.clone());
                }
                current.version().next()?
            }
            None => WorkflowVersion::FIRST,
        };

        let target = PublishTarget {
            workflow_id,
            space_id: request.space_id,
            version,
        };
        let definition = WorkflowDefinition::publish(&request.draft, target, &*self.clock)?;
        self.workflows.store_version(&definition).await?;
        tracing::info!(
            workflow_id = %workflow_id,
            version = %version,
            statuses = definition.statuses().len(),
            transitions = definition.transitions().len(),
            "published workflow version"
        );
        Ok(definition)
    }

    /// Loads one specific workflow version.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::VersionNotFound`] when the version
    /// does not exist, or [`WorkflowServiceError::Repository`] on storage
    /// failure.
    pub async fn find_version(
        &self,
        workflow_id: WorkflowId,
        version: WorkflowVersion,
    ) -> WorkflowServiceResult<WorkflowDefinition> {
        self.workflows
            .find_version(workflow_id, version)
            .await?
            .ok_or(WorkflowServiceError::VersionNotFound {
                workflow_id,
                version,
            })
    }

    /// Loads the highest published version of a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::WorkflowNotFound`] when the workflow
    /// was never published, or [`WorkflowServiceError::Repository`] on
    /// storage failure.
    pub async fn latest_version(
        &self,
        workflow_id: WorkflowId,
    ) -> WorkflowServiceResult<WorkflowDefinition> {
        self.workflows
            .latest_version(workflow_id)
            .await?
            .ok_or(WorkflowServiceError::WorkflowNotFound(workflow_id))
    }

    /// Resolves a transition by id or key within exactly one version.
    ///
    /// Resolution never falls through to a newer version, so a key that only
    /// exists in a later version is not found.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::VersionNotFound`] or
    /// [`WorkflowServiceError::TransitionNotFound`] when nothing matches.
    pub async fn resolve_transition(
        &self,
        workflow_id: WorkflowId,
        version: WorkflowVersion,
        selector: &TransitionSelector,
    ) -> WorkflowServiceResult<Transition> {
        let definition = self.find_version(workflow_id, version).await?;
        resolve_within(&definition, selector).cloned()
    }

    /// Loads a task and the workflow version it is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::TaskNotFound`] or
    /// [`WorkflowServiceError::VersionNotFound`] when either side is missing.
    pub async fn load_task_context(&self, task_id: TaskId) -> WorkflowServiceResult<TaskSnapshot> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(WorkflowServiceError::TaskNotFound(task_id))?;
        let binding = task.binding();
        let workflow = self
            .find_version(binding.workflow_id, binding.version)
            .await?;
        Ok(TaskSnapshot {
            task,
            workflow: Arc::new(workflow),
        })
    }
}

fn resolve_within<'a>(
    definition: &'a WorkflowDefinition,
    selector: &TransitionSelector,
) -> WorkflowServiceResult<&'a Transition> {
    definition
        .resolve(selector)
        .ok_or_else(|| WorkflowServiceError::TransitionNotFound {
            workflow_id: definition.id(),
            version: definition.version(),
            selector: selector.clone(),
        })
}
