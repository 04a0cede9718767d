//! Diesel row models for task storage.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result and insert row for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning space.
    pub space_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional priority.
    pub priority: Option<String>,
    /// Tag JSON array.
    pub tags: Value,
    /// Custom-field JSON object.
    pub custom_fields: Value,
    /// Subtask JSON array.
    pub subtasks: Value,
    /// Bound workflow.
    pub workflow_id: uuid::Uuid,
    /// Bound workflow version.
    pub workflow_version: i32,
    /// Current workflow status.
    pub workflow_status_id: uuid::Uuid,
    /// Mirrored legacy status.
    pub legacy_status_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for field-level updates. Excludes every workflow column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskFieldsChangeset {
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional priority.
    pub priority: Option<String>,
    /// Tag JSON array.
    pub tags: Value,
    /// Custom-field JSON object.
    pub custom_fields: Value,
    /// Subtask JSON array.
    pub subtasks: Value,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
