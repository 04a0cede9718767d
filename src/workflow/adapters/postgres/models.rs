//! Diesel row models for workflow version storage.

use super::schema::workflow_versions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result and insert row for workflow versions.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = workflow_versions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkflowVersionRow {
    /// Workflow identifier.
    pub workflow_id: uuid::Uuid,
    /// Version number.
    pub version: i32,
    /// Owning space.
    pub space_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Status JSON array.
    pub statuses: Value,
    /// Transition JSON array.
    pub transitions: Value,
    /// Draft digest.
    pub digest: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
}
