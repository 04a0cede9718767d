//! Shared helpers for `PostgreSQL` adapter integration tests.
//!
//! Uses `pg-embed-setup-unpriv` for embedded `PostgreSQL` lifecycle
//! management. Each test gets its own database cloned from a migrated
//! template.

use diesel::prelude::*;
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use switchyard::access::domain::SpaceId;
use switchyard::config::DatabaseConfig;
use switchyard::task::{adapters::postgres::PostgresTaskStore, domain::Task, ports::TaskStore};
use switchyard::workflow::{
    adapters::postgres::PostgresWorkflowRepository,
    domain::{
        PublishTarget, StatusDraft, StatusId, TransitionDraft, WorkflowDefinition, WorkflowDraft,
        WorkflowId, WorkflowVersion,
    },
    ports::WorkflowRepository,
};
use tokio::runtime::Runtime;

const WORKFLOW_VERSIONS_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_workflow_versions/up.sql");

const TASKS_SQL: &str = include_str!("../../migrations/2026-10-01-000001_create_tasks/up.sql");

/// Template database name for pre-migrated schema.
const TEMPLATE_DB: &str = "switchyard_test_template";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Adapters over one freshly migrated database.
///
/// Field order matters: the adapters release their pooled connection before
/// the guard drops the database.
pub struct PostgresHarness {
    pub runtime: Runtime,
    pub workflows: PostgresWorkflowRepository,
    pub tasks: PostgresTaskStore,
    _guard: CleanupGuard,
}

impl PostgresHarness {
    /// Creates a database named after `label` and opens both adapters on a
    /// single-connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the template, database, or pool cannot be set up.
    pub fn new(cluster: &'static TestCluster, label: &str) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let db_name = format!("test_{label}_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
            .map_err(|e| Box::new(e) as BoxError)?;
        let guard = CleanupGuard { cluster, db_name };

        let database = DatabaseConfig::new(cluster.connection().database_url(&guard.db_name))
            .with_max_connections(1);
        let pool = database.build_pool()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            workflows: PostgresWorkflowRepository::new(pool.clone()),
            tasks: PostgresTaskStore::new(pool),
            _guard: guard,
        })
    }

    /// Stores version 1 of the review workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft does not publish or cannot be stored.
    pub fn store_workflow(&self) -> eyre::Result<WorkflowDefinition> {
        let definition = WorkflowDefinition::publish(
            &review_draft(),
            PublishTarget {
                workflow_id: WorkflowId::new(),
                space_id: SpaceId::new(),
                version: WorkflowVersion::FIRST,
            },
            &DefaultClock,
        )
        .wrap_err("publish review workflow")?;
        self.runtime
            .block_on(self.workflows.store_version(&definition))
            .wrap_err("store workflow version")?;
        Ok(definition)
    }

    /// Stores a task bound to `workflow` at its initial status.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be built or stored.
    pub fn store_task(&self, workflow: &WorkflowDefinition) -> eyre::Result<Task> {
        let binding = workflow
            .initial_binding()
            .ok_or_else(|| eyre!("workflow has no initial status"))?;
        let task = Task::new(workflow.space_id(), "Rotate keys", binding, &DefaultClock)
            .wrap_err("build task")?;
        self.runtime
            .block_on(self.tasks.store(&task))
            .wrap_err("store task")?;
        Ok(task)
    }
}

/// `OPEN -> REVIEW -> DONE`, with `DONE` mirrored to a legacy status.
#[must_use]
pub fn review_draft() -> WorkflowDraft {
    WorkflowDraft::new("Review flow")
        .with_status(StatusDraft::new("OPEN", "Open", "todo"))
        .with_status(StatusDraft::new("REVIEW", "In Review", "in_progress"))
        .with_status(
            StatusDraft::new("DONE", "Done", "done")
                .final_status()
                .with_legacy_status("closed"),
        )
        .with_transition(TransitionDraft::new("SEND", "Send to review", "OPEN", "REVIEW"))
        .with_transition(TransitionDraft::new("APPROVE", "Approve", "REVIEW", "DONE"))
}

/// Looks up a status identifier by key.
///
/// # Errors
///
/// Returns an error if the workflow has no such status.
pub fn status_id(workflow: &WorkflowDefinition, key: &str) -> eyre::Result<StatusId> {
    workflow
        .status_by_key(key)
        .map(|status| status.id())
        .ok_or_else(|| eyre!("status {key} not found"))
}

/// Ensures the template database exists with the schema applied.
fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre!("{e}"))?;
            // diesel::sql_query runs one statement per call.
            execute_sql_statements(&mut conn, WORKFLOW_VERSIONS_SQL)?;
            execute_sql_statements(&mut conn, TASKS_SQL)?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Executes each non-empty, non-comment statement of a migration in order.
fn execute_sql_statements(conn: &mut PgConnection, sql: &str) -> eyre::Result<()> {
    for statement in sql.split(';') {
        let trimmed = statement.trim();
        if trimmed.is_empty() || trimmed.lines().all(|line| line.trim().starts_with("--")) {
            continue;
        }
        diesel::sql_query(trimmed)
            .execute(conn)
            .map_err(|e| eyre!("SQL error: {e}\nStatement: {trimmed}"))?;
    }
    Ok(())
}

/// Drops the test database even if the test panics.
struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    #[expect(
        clippy::print_stderr,
        reason = "Test cleanup warnings are informational"
    )]
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}
