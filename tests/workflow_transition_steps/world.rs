//! Shared world state for workflow transition BDD scenarios.

use std::sync::Arc;

use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;
use switchyard::access::{
    adapters::memory::{InMemoryIdentityDirectory, InMemorySpaceRoles},
    domain::{SpaceId, UserId},
};
use switchyard::activity::adapters::memory::{InMemoryActivityLog, RecordingNotifier};
use switchyard::config::RecommendationConfig;
use switchyard::recommendation::{domain::TransitionSuggestion, services::SuggestionService};
use switchyard::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{SubtaskId, Task, TaskId},
    ports::TaskStore,
};
use switchyard::transition::{
    domain::{TransitionReceipt, TransitionResult},
    services::{TransitionCollaborators, TransitionExecutor},
};
use switchyard::workflow::{
    adapters::memory::InMemoryWorkflowRepository,
    domain::{
        StatusDraft, StatusId, TransitionDraft, WorkflowDefinition, WorkflowDraft, WorkflowStatus,
    },
    services::WorkflowDefinitionService,
};

/// Executor type used by the BDD world.
pub type TestExecutor = TransitionExecutor<
    InMemoryWorkflowRepository,
    InMemoryTaskStore,
    InMemorySpaceRoles,
    InMemoryIdentityDirectory,
    InMemoryActivityLog,
    RecordingNotifier,
    DefaultClock,
>;

/// Scenario world for workflow transition behaviour tests.
pub struct WorkflowWorld {
    pub space_id: SpaceId,
    pub requester: UserId,
    pub definitions:
        WorkflowDefinitionService<InMemoryWorkflowRepository, InMemoryTaskStore, DefaultClock>,
    pub executor: TestExecutor,
    pub suggestions: SuggestionService<
        InMemoryWorkflowRepository,
        InMemoryTaskStore,
        InMemoryActivityLog,
        DefaultClock,
    >,
    pub tasks: Arc<InMemoryTaskStore>,
    pub roles: Arc<InMemorySpaceRoles>,
    pub workflow: Option<WorkflowDefinition>,
    pub pending_task: Option<Task>,
    pub stored_task: Option<TaskId>,
    pub subtask_id: Option<SubtaskId>,
    pub last_result: Option<TransitionResult<TransitionReceipt>>,
    pub last_suggestion: Option<Option<TransitionSuggestion>>,
}

impl WorkflowWorld {
    /// Creates a world with empty adapters and no published workflow.
    #[must_use]
    pub fn new() -> Self {
        let workflows = Arc::new(InMemoryWorkflowRepository::new());
        let tasks = Arc::new(InMemoryTaskStore::new());
        let roles = Arc::new(InMemorySpaceRoles::new());
        let activity = Arc::new(InMemoryActivityLog::new());
        let clock = Arc::new(DefaultClock);

        let executor = TransitionExecutor::new(
            TransitionCollaborators {
                workflows: Arc::clone(&workflows),
                tasks: Arc::clone(&tasks),
                roles: Arc::clone(&roles),
                identities: Arc::new(InMemoryIdentityDirectory::new()),
                activity: Arc::clone(&activity),
                notifier: Arc::new(RecordingNotifier::new()),
            },
            Arc::clone(&clock),
        );
        let definitions = WorkflowDefinitionService::new(workflows, Arc::clone(&tasks), clock);
        let suggestions = SuggestionService::new(
            definitions.clone(),
            activity,
            &RecommendationConfig::default(),
        );

        Self {
            space_id: SpaceId::new(),
            requester: UserId::new(),
            definitions,
            executor,
            suggestions,
            tasks,
            roles,
            workflow: None,
            pending_task: None,
            stored_task: None,
            subtask_id: None,
            last_result: None,
            last_suggestion: None,
        }
    }

    /// Returns the published workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if no workflow was published yet.
    pub fn workflow(&self) -> eyre::Result<&WorkflowDefinition> {
        self.workflow
            .as_ref()
            .ok_or_else(|| eyre!("missing published workflow in scenario world"))
    }

    /// Resolves a status key of the published workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown.
    pub fn status_id(&self, key: &str) -> eyre::Result<StatusId> {
        self.workflow()?
            .status_by_key(key)
            .map(WorkflowStatus::id)
            .ok_or_else(|| eyre!("unknown status key '{key}'"))
    }

    /// Returns the identifier of the task already handed to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if no When step has stored the task yet.
    pub fn stored_task_id(&self) -> eyre::Result<TaskId> {
        self.stored_task
            .ok_or_else(|| eyre!("scenario task was never stored"))
    }

    /// Stores the pending task on first use and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no task was described or storing fails.
    pub fn task_id(&mut self) -> eyre::Result<TaskId> {
        if let Some(task_id) = self.stored_task {
            return Ok(task_id);
        }
        let task = self
            .pending_task
            .take()
            .ok_or_else(|| eyre!("missing task in scenario world"))?;
        run_async(self.tasks.store(&task)).wrap_err("store scenario task")?;
        self.stored_task = Some(task.id());
        Ok(task.id())
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// `Open -> In Review -> Done` with an admin-only shortcut and a guarded
/// approval.
pub fn delivery_draft() -> WorkflowDraft {
    WorkflowDraft::new("Delivery")
        .with_status(StatusDraft::new("OPEN", "Open", "todo"))
        .with_status(StatusDraft::new("REVIEW", "In Review", "in_progress"))
        .with_status(StatusDraft::new("DONE", "Done", "done").final_status())
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
                .with_post_function(json!({ "type": "NOTIFY", "recipients": ["REQUESTER"] })),
        )
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
