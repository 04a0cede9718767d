//! Shared test helpers for in-memory engine integration tests.

use std::sync::Arc;

use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;
use switchyard::access::{
    adapters::memory::{InMemoryIdentityDirectory, InMemorySpaceRoles},
    domain::{SpaceId, SpaceRole, UserId},
};
use switchyard::activity::adapters::memory::{InMemoryActivityLog, RecordingNotifier};
use switchyard::config::RecommendationConfig;
use switchyard::recommendation::services::SuggestionService;
use switchyard::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Task, TaskId},
    ports::TaskStore,
};
use switchyard::transition::services::{TransitionCollaborators, TransitionExecutor};
use switchyard::workflow::{
    adapters::memory::InMemoryWorkflowRepository,
    domain::{
        StatusDraft, StatusId, TransitionDraft, TransitionKey, TransitionSelector,
        WorkflowDefinition, WorkflowDraft, WorkflowId, WorkflowStatus,
    },
    services::{PublishWorkflowRequest, WorkflowDefinitionService},
};

/// Executor wired to in-memory adapters, over any task store.
pub type Executor<T = InMemoryTaskStore> = TransitionExecutor<
    InMemoryWorkflowRepository,
    T,
    InMemorySpaceRoles,
    InMemoryIdentityDirectory,
    InMemoryActivityLog,
    RecordingNotifier,
    DefaultClock,
>;

/// Suggestion service wired to in-memory adapters.
pub type Suggestions = SuggestionService<
    InMemoryWorkflowRepository,
    InMemoryTaskStore,
    InMemoryActivityLog,
    DefaultClock,
>;

/// All in-memory adapters shared by one test.
pub struct Engine {
    pub space_id: SpaceId,
    pub workflows: Arc<InMemoryWorkflowRepository>,
    pub tasks: Arc<InMemoryTaskStore>,
    pub roles: Arc<InMemorySpaceRoles>,
    pub identities: Arc<InMemoryIdentityDirectory>,
    pub activity: Arc<InMemoryActivityLog>,
    pub notifier: Arc<RecordingNotifier>,
    pub definitions:
        WorkflowDefinitionService<InMemoryWorkflowRepository, InMemoryTaskStore, DefaultClock>,
}

/// Provides a fresh engine for each test.
#[fixture]
pub fn engine() -> Engine {
    let workflows = Arc::new(InMemoryWorkflowRepository::new());
    let tasks = Arc::new(InMemoryTaskStore::new());
    let definitions = WorkflowDefinitionService::new(
        Arc::clone(&workflows),
        Arc::clone(&tasks),
        Arc::new(DefaultClock),
    );
    Engine {
        space_id: SpaceId::new(),
        workflows,
        tasks,
        roles: Arc::new(InMemorySpaceRoles::new()),
        identities: Arc::new(InMemoryIdentityDirectory::new()),
        activity: Arc::new(InMemoryActivityLog::new()),
        notifier: Arc::new(RecordingNotifier::new()),
        definitions,
    }
}

/// `Open -> In Review -> Done`, with an admin-only shortcut to `Done` and
/// a gated approval out of review.
pub fn delivery_draft() -> WorkflowDraft {
    WorkflowDraft::new("Delivery")
        .with_status(StatusDraft::new("OPEN", "Open", "todo").with_legacy_status("open"))
        .with_status(StatusDraft::new("REVIEW", "In Review", "in_progress"))
        .with_status(
            StatusDraft::new("DONE", "Done", "done")
                .final_status()
                .with_legacy_status("closed"),
        )
        .with_transition(TransitionDraft::new(
            "SEND_TO_REVIEW",
            "Send to review",
            "OPEN",
            "REVIEW",
        ))
        .with_transition(
            TransitionDraft::new("CLOSE", "Close", "OPEN", "DONE").with_roles(["ADMIN"]),
        )
        .with_transition(
            TransitionDraft::new("APPROVE", "Approve", "REVIEW", "DONE")
                .with_required_fields(["dueDate"])
                .with_validators(["NO_OPEN_SUBTASKS"])
                .with_post_function(json!({
                    "type": "NOTIFY",
                    "recipients": ["REQUESTER"],
                    "template": "{{ task.title }} approved"
                })),
        )
}

impl Engine {
    /// Publishes a new workflow in the engine's space.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft does not publish.
    pub async fn publish(&self, draft: WorkflowDraft) -> eyre::Result<WorkflowDefinition> {
        self.definitions
            .publish(PublishWorkflowRequest::new(self.space_id, draft))
            .await
            .wrap_err("publish workflow")
    }

    /// Publishes the next version of an existing workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft does not publish.
    pub async fn republish(
        &self,
        workflow_id: WorkflowId,
        draft: WorkflowDraft,
    ) -> eyre::Result<WorkflowDefinition> {
        self.definitions
            .publish(PublishWorkflowRequest::new(self.space_id, draft).for_workflow(workflow_id))
            .await
            .wrap_err("republish workflow")
    }

    /// Stores a task at `workflow`'s initial status after `customise`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be built or stored.
    pub async fn create_task(
        &self,
        workflow: &WorkflowDefinition,
        customise: impl FnOnce(Task) -> Task,
    ) -> eyre::Result<Task> {
        let binding = workflow
            .initial_binding()
            .ok_or_else(|| eyre!("workflow has no statuses"))?;
        let task = customise(
            Task::new(self.space_id, "Ship release notes", binding, &DefaultClock)
                .wrap_err("build task")?,
        );
        self.tasks.store(&task).await.wrap_err("store task")?;
        Ok(task)
    }

    /// Reads a task back from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is missing or the lookup fails.
    pub async fn reload(&self, task_id: TaskId) -> eyre::Result<Task> {
        self.tasks
            .find_by_id(task_id)
            .await
            .wrap_err("find task")?
            .ok_or_else(|| eyre!("task {task_id} not found"))
    }

    /// Grants a space role to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is invalid.
    pub fn grant(&self, user_id: UserId, role: &str) -> eyre::Result<()> {
        let space_role = SpaceRole::new(role).wrap_err("parse role")?;
        self.roles
            .grant(self.space_id, user_id, space_role)
            .wrap_err("grant role")
    }

    /// Builds an executor over the engine's own task store.
    pub fn executor(&self) -> Executor {
        self.executor_over(Arc::clone(&self.tasks))
    }

    /// Builds an executor over `tasks`, sharing every other adapter.
    pub fn executor_over<T: TaskStore>(&self, tasks: Arc<T>) -> Executor<T> {
        TransitionExecutor::new(
            TransitionCollaborators {
                workflows: Arc::clone(&self.workflows),
                tasks,
                roles: Arc::clone(&self.roles),
                identities: Arc::clone(&self.identities),
                activity: Arc::clone(&self.activity),
                notifier: Arc::clone(&self.notifier),
            },
            Arc::new(DefaultClock),
        )
    }

    /// Builds a suggestion service with the default history depth.
    pub fn suggestions(&self) -> Suggestions {
        SuggestionService::new(
            self.definitions.clone(),
            Arc::clone(&self.activity),
            &RecommendationConfig::default(),
        )
    }
}

/// Looks up a status identifier by key.
///
/// # Errors
///
/// Returns an error if the workflow has no such status.
pub fn status_id(workflow: &WorkflowDefinition, key: &str) -> eyre::Result<StatusId> {
    workflow
        .status_by_key(key)
        .map(WorkflowStatus::id)
        .ok_or_else(|| eyre!("workflow has no status '{key}'"))
}

/// Builds a key selector.
///
/// # Errors
///
/// Returns an error if the key is invalid.
pub fn by_key(raw: &str) -> eyre::Result<TransitionSelector> {
    Ok(TransitionSelector::Key(
        TransitionKey::new(raw).wrap_err("parse transition key")?,
    ))
}
