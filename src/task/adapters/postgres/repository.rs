//! `PostgreSQL` task store.

use super::{
    models::{TaskFieldsChangeset, TaskRow},
    schema::tasks,
};
use crate::access::domain::{SpaceId, UserId};
use crate::task::{
    domain::{PersistedTaskData, Priority, Subtask, Task, TaskFieldUpdate, TaskId, WorkflowBinding},
    ports::{StatusChange, TaskStore, TaskStoreError, TaskStoreResult},
};
use crate::workflow::domain::{LegacyStatusId, StatusId, WorkflowId, WorkflowVersion};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeMap;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

impl From<DieselError> for TaskStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let row = task_to_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::DuplicateTask(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn compare_and_set_status(&self, change: &StatusChange) -> TaskStoreResult<Task> {
        let StatusChange {
            task_id,
            expected_status_id,
            new_status_id,
            legacy_status_id,
            updated_at,
        } = change.clone();
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::workflow_status_id.eq(expected_status_id.into_inner())),
            )
            .set((
                tasks::workflow_status_id.eq(new_status_id.into_inner()),
                tasks::legacy_status_id.eq(legacy_status_id.map(|legacy| legacy.as_str().to_owned())),
                tasks::updated_at.eq(updated_at),
            ))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(connection)
            .optional()?;

            if let Some(row) = updated {
                return row_to_task(row);
            }

            let current = tasks::table
                .filter(tasks::id.eq(task_id.into_inner()))
                .select(tasks::workflow_status_id)
                .first::<uuid::Uuid>(connection)
                .optional()?;
            match current {
                None => Err(TaskStoreError::NotFound(task_id)),
                Some(actual) => Err(TaskStoreError::StatusConflict {
                    task_id,
                    expected: expected_status_id,
                    actual: StatusId::from_uuid(actual),
                }),
            }
        })
        .await
    }

    async fn apply_updates(
        &self,
        id: TaskId,
        updates: &[TaskFieldUpdate],
        updated_at: DateTime<Utc>,
    ) -> TaskStoreResult<Task> {
        let batch = updates.to_vec();
        self.run_blocking(move |connection| {
            connection.transaction::<Task, TaskStoreError, _>(|connection| {
                let row = tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(connection)
                    .optional()?
                    .ok_or(TaskStoreError::NotFound(id))?;
                let mut task = row_to_task(row)?;
                for update in &batch {
                    task.apply_update(update, updated_at)?;
                }
                let changeset = fields_changeset(&task)?;
                let written = diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                    .set(&changeset)
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(connection)?;
                row_to_task(written)
            })
        })
        .await
    }
}

fn version_to_column(version: WorkflowVersion) -> TaskStoreResult<i32> {
    i32::try_from(version.value()).map_err(TaskStoreError::persistence)
}

fn task_to_row(task: &Task) -> TaskStoreResult<TaskRow> {
    let binding = task.binding();
    Ok(TaskRow {
        id: task.id().into_inner(),
        space_id: task.space_id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        due_date: task.due_date(),
        priority: task.priority().map(|priority| priority.as_str().to_owned()),
        tags: serde_json::to_value(task.tags()).map_err(TaskStoreError::persistence)?,
        custom_fields: serde_json::to_value(task.custom_fields())
            .map_err(TaskStoreError::persistence)?,
        subtasks: serde_json::to_value(task.subtasks()).map_err(TaskStoreError::persistence)?,
        workflow_id: binding.workflow_id.into_inner(),
        workflow_version: version_to_column(binding.version)?,
        workflow_status_id: binding.status_id.into_inner(),
        legacy_status_id: task
            .legacy_status_id()
            .map(|legacy| legacy.as_str().to_owned()),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn fields_changeset(task: &Task) -> TaskStoreResult<TaskFieldsChangeset> {
    let row = task_to_row(task)?;
    Ok(TaskFieldsChangeset {
        title: row.title,
        description: row.description,
        assignee_id: row.assignee_id,
        due_date: row.due_date,
        priority: row.priority,
        tags: row.tags,
        custom_fields: row.custom_fields,
        subtasks: row.subtasks,
        updated_at: row.updated_at,
    })
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        space_id,
        title,
        description,
        assignee_id,
        due_date,
        priority: persisted_priority,
        tags: persisted_tags,
        custom_fields: persisted_custom_fields,
        subtasks: persisted_subtasks,
        workflow_id,
        workflow_version,
        workflow_status_id,
        legacy_status_id,
        created_at,
        updated_at,
    } = row;

    let version_number = u32::try_from(workflow_version).map_err(TaskStoreError::persistence)?;
    let version = WorkflowVersion::new(version_number).map_err(TaskStoreError::persistence)?;
    let priority = persisted_priority
        .as_deref()
        .map(Priority::try_from)
        .transpose()
        .map_err(TaskStoreError::persistence)?;
    let tags = serde_json::from_value::<Vec<String>>(persisted_tags)
        .map_err(TaskStoreError::persistence)?;
    let custom_fields =
        serde_json::from_value::<BTreeMap<String, serde_json::Value>>(persisted_custom_fields)
            .map_err(TaskStoreError::persistence)?;
    let subtasks = serde_json::from_value::<Vec<Subtask>>(persisted_subtasks)
        .map_err(TaskStoreError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        space_id: SpaceId::from_uuid(space_id),
        title,
        description,
        assignee_id: assignee_id.map(UserId::from_uuid),
        due_date,
        priority,
        tags,
        custom_fields,
        subtasks,
        binding: WorkflowBinding {
            workflow_id: WorkflowId::from_uuid(workflow_id),
            version,
            status_id: StatusId::from_uuid(workflow_status_id),
        },
        legacy_status_id: legacy_status_id.map(LegacyStatusId::new),
        created_at,
        updated_at,
    }))
}
