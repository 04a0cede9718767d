//! Task aggregate and its workflow binding.

use super::{Priority, SubtaskId, TaskDomainError, TaskField, TaskFieldUpdate, TaskId};
use crate::access::domain::{SpaceId, UserId};
use crate::workflow::domain::{LegacyStatusId, StatusId, WorkflowId, WorkflowVersion};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The workflow version a task runs under and its position in it.
///
/// A binding always names a concrete version, never "the latest".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowBinding {
    /// Bound workflow.
    pub workflow_id: WorkflowId,
    /// Bound version.
    pub version: WorkflowVersion,
    /// Current workflow status.
    pub status_id: StatusId,
}

/// A checklist item belonging to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    id: SubtaskId,
    title: String,
    done: bool,
}

impl Subtask {
    /// Creates an open subtask.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SubtaskId::new(),
            title: title.into(),
            done: false,
        }
    }

    /// Reconstructs a persisted subtask.
    #[must_use]
    pub fn from_persisted(id: SubtaskId, title: impl Into<String>, done: bool) -> Self {
        Self {
            id,
            title: title.into(),
            done,
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubtaskId {
        self.id
    }

    /// Returns the subtask title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns `true` when the subtask is done.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    space_id: SpaceId,
    title: String,
    description: Option<String>,
    assignee_id: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<Priority>,
    tags: Vec<String>,
    custom_fields: BTreeMap<String, Value>,
    subtasks: Vec<Subtask>,
    binding: WorkflowBinding,
    legacy_status_id: Option<LegacyStatusId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning space.
    pub space_id: SpaceId,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional assignee.
    pub assignee_id: Option<UserId>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional priority.
    pub priority: Option<Priority>,
    /// Tags.
    pub tags: Vec<String>,
    /// Custom-field values by key.
    pub custom_fields: BTreeMap<String, Value>,
    /// Subtasks.
    pub subtasks: Vec<Subtask>,
    /// Workflow binding.
    pub binding: WorkflowBinding,
    /// Mirrored legacy simple status.
    pub legacy_status_id: Option<LegacyStatusId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task bound to a workflow version.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        space_id: SpaceId,
        title: impl Into<String>,
        binding: WorkflowBinding,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let trimmed = raw_title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            space_id,
            title: trimmed.to_owned(),
            description: None,
            assignee_id: None,
            due_date: None,
            priority: None,
            tags: Vec::new(),
            custom_fields: BTreeMap::new(),
            subtasks: Vec::new(),
            binding,
            legacy_status_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            space_id: data.space_id,
            title: data.title,
            description: data.description,
            assignee_id: data.assignee_id,
            due_date: data.due_date,
            priority: data.priority,
            tags: data.tags,
            custom_fields: data.custom_fields,
            subtasks: data.subtasks,
            binding: data.binding,
            legacy_status_id: data.legacy_status_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets a custom-field value.
    #[must_use]
    pub fn with_custom_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.custom_fields.insert(key.into(), value);
        self
    }

    /// Appends a subtask.
    #[must_use]
    pub fn with_subtask(mut self, subtask: Subtask) -> Self {
        self.subtasks.push(subtask);
        self
    }

    /// Sets the mirrored legacy status.
    #[must_use]
    pub fn with_legacy_status(mut self, legacy_status_id: LegacyStatusId) -> Self {
        self.legacy_status_id = Some(legacy_status_id);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning space.
    #[must_use]
    pub const fn space_id(&self) -> SpaceId {
        self.space_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns all custom-field values.
    #[must_use]
    pub const fn custom_fields(&self) -> &BTreeMap<String, Value> {
        &self.custom_fields
    }

    /// Returns the subtasks.
    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    /// Returns the workflow binding.
    #[must_use]
    pub const fn binding(&self) -> WorkflowBinding {
        self.binding
    }

    /// Returns the current workflow status.
    #[must_use]
    pub const fn workflow_status_id(&self) -> StatusId {
        self.binding.status_id
    }

    /// Returns the mirrored legacy status, if any.
    #[must_use]
    pub const fn legacy_status_id(&self) -> Option<&LegacyStatusId> {
        self.legacy_status_id.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `field` holds a non-empty value.
    #[must_use]
    pub fn has_field(&self, field: TaskField) -> bool {
        match field {
            TaskField::Title => !self.title.trim().is_empty(),
            TaskField::Description => self
                .description
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty()),
            TaskField::AssigneeId => self.assignee_id.is_some(),
            TaskField::DueDate => self.due_date.is_some(),
            TaskField::Priority => self.priority.is_some(),
            TaskField::Tags => !self.tags.is_empty(),
        }
    }

    /// Returns `true` when the custom field `key` holds a non-empty value.
    ///
    /// `null`, blank strings, and empty arrays or objects count as empty.
    #[must_use]
    pub fn has_custom_value(&self, key: &str) -> bool {
        self.custom_fields.get(key).is_some_and(|value| match value {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(entries) => !entries.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        })
    }

    /// Returns subtasks that are not done.
    pub fn open_subtasks(&self) -> impl Iterator<Item = &Subtask> {
        self.subtasks.iter().filter(|subtask| !subtask.is_done())
    }

    /// Returns `true` if the task carries `tag`, ignoring ASCII case.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|own| own.trim().eq_ignore_ascii_case(tag))
    }

    /// Moves the task to `new_status_id` if it is still in `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StaleStatus`] when the task has moved.
    pub fn move_to_status(
        &mut self,
        expected: StatusId,
        new_status_id: StatusId,
        legacy_status_id: Option<LegacyStatusId>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.binding.status_id != expected {
            return Err(TaskDomainError::StaleStatus {
                task_id: self.id,
                expected,
                actual: self.binding.status_id,
            });
        }
        self.binding.status_id = new_status_id;
        self.legacy_status_id = legacy_status_id;
        self.updated_at = updated_at;
        Ok(())
    }

    /// Applies one field-level update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title or
    /// [`TaskDomainError::SubtaskNotFound`] for an unknown subtask.
    pub fn apply_update(
        &mut self,
        update: &TaskFieldUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        match update {
            TaskFieldUpdate::Title(title) => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return Err(TaskDomainError::EmptyTitle);
                }
                trimmed.clone_into(&mut self.title);
            }
            TaskFieldUpdate::Description(description) => {
                self.description.clone_from(description);
            }
            TaskFieldUpdate::DueDate(due_date) => self.due_date = *due_date,
            TaskFieldUpdate::Priority(priority) => self.priority = *priority,
            TaskFieldUpdate::Assignee(assignee_id) => self.assignee_id = *assignee_id,
            TaskFieldUpdate::SubtaskDone { subtask_id, done } => {
                let task_id = self.id;
                let subtask = self
                    .subtasks
                    .iter_mut()
                    .find(|subtask| subtask.id == *subtask_id)
                    .ok_or(TaskDomainError::SubtaskNotFound {
                        task_id,
                        subtask_id: *subtask_id,
                    })?;
                subtask.done = *done;
            }
            TaskFieldUpdate::CustomField { key, value } => {
                if value.is_null() {
                    self.custom_fields.remove(key);
                } else {
                    self.custom_fields.insert(key.clone(), value.clone());
                }
            }
        }
        self.updated_at = updated_at;
        Ok(())
    }
}
