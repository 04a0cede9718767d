//! In-memory task store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskDomainError, TaskFieldUpdate, TaskId},
    ports::{StatusChange, TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// The conditional status write holds the write lock only for the
/// check-and-set itself.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().map_err(lock_error)?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let tasks = self.tasks.read().map_err(lock_error)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn compare_and_set_status(&self, change: &StatusChange) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().map_err(lock_error)?;
        let task = tasks
            .get_mut(&change.task_id)
            .ok_or(TaskStoreError::NotFound(change.task_id))?;
        task.move_to_status(
            change.expected_status_id,
            change.new_status_id,
            change.legacy_status_id.clone(),
            change.updated_at,
        )
        .map_err(|err| match err {
            TaskDomainError::StaleStatus {
                task_id,
                expected,
                actual,
            } => TaskStoreError::StatusConflict {
                task_id,
                expected,
                actual,
            },
            other => TaskStoreError::Domain(other),
        })?;
        Ok(task.clone())
    }

    async fn apply_updates(
        &self,
        id: TaskId,
        updates: &[TaskFieldUpdate],
        updated_at: DateTime<Utc>,
    ) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().map_err(lock_error)?;
        let stored = tasks.get_mut(&id).ok_or(TaskStoreError::NotFound(id))?;
        let mut candidate = stored.clone();
        for update in updates {
            candidate.apply_update(update, updated_at)?;
        }
        *stored = candidate.clone();
        Ok(candidate)
    }
}
