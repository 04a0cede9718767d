//! Named task attributes referenced by workflow configuration.

use super::{Priority, SubtaskId, TaskDomainError};
use crate::access::domain::UserId;
use crate::token;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Standard task attribute that a transition may require to be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Current assignee.
    AssigneeId,
    /// Due date.
    DueDate,
    /// Priority level.
    Priority,
    /// Tag list.
    Tags,
}

impl TaskField {
    /// Decodes a field name, ignoring case and separators.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match token::fold(raw).as_str() {
            "TITLE" => Some(Self::Title),
            "DESCRIPTION" => Some(Self::Description),
            "ASSIGNEE" | "ASSIGNEEID" => Some(Self::AssigneeId),
            "DUEDATE" => Some(Self::DueDate),
            "PRIORITY" => Some(Self::Priority),
            "TAGS" => Some(Self::Tags),
            _ => None,
        }
    }

    /// Returns the canonical field name reported to callers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::AssigneeId => "assigneeId",
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task attribute that a `SET_FIELD` post-function may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutableTaskField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Due date.
    DueDate,
    /// Priority level.
    Priority,
}

impl MutableTaskField {
    /// Decodes a field name, ignoring case and separators.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match token::fold(raw).as_str() {
            "TITLE" => Some(Self::Title),
            "DESCRIPTION" => Some(Self::Description),
            "DUEDATE" => Some(Self::DueDate),
            "PRIORITY" => Some(Self::Priority),
            _ => None,
        }
    }

    /// Returns the canonical field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
        }
    }
}

/// A single field-level change to a task that leaves its status untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TaskFieldUpdate {
    /// Replaces the title.
    Title(String),
    /// Replaces or clears the description.
    Description(Option<String>),
    /// Replaces or clears the due date.
    DueDate(Option<DateTime<Utc>>),
    /// Replaces or clears the priority.
    Priority(Option<Priority>),
    /// Reassigns or unassigns the task.
    Assignee(Option<UserId>),
    /// Marks a subtask done or not done.
    SubtaskDone {
        /// The subtask to update.
        subtask_id: SubtaskId,
        /// The new completion state.
        done: bool,
    },
    /// Replaces a custom-field value; `null` clears it.
    CustomField {
        /// Custom-field key.
        key: String,
        /// New value.
        value: Value,
    },
}

impl TaskFieldUpdate {
    /// Interprets a configured JSON value against `field`'s type.
    ///
    /// Due dates accept RFC 3339 timestamps or `YYYY-MM-DD` dates (midnight
    /// UTC). `null` clears optional fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidFieldValue`] when the value has the
    /// wrong shape, or [`TaskDomainError::EmptyTitle`] for a blank title.
    pub fn from_configured(field: MutableTaskField, value: &Value) -> Result<Self, TaskDomainError> {
        let invalid = |reason: &str| TaskDomainError::InvalidFieldValue {
            field: field.as_str(),
            reason: reason.to_owned(),
        };
        match field {
            MutableTaskField::Title => match value {
                Value::String(title) if !title.trim().is_empty() => {
                    Ok(Self::Title(title.trim().to_owned()))
                }
                Value::String(_) => Err(TaskDomainError::EmptyTitle),
                _ => Err(invalid("expected a string")),
            },
            MutableTaskField::Description => match value {
                Value::Null => Ok(Self::Description(None)),
                Value::String(text) => Ok(Self::Description(Some(text.clone()))),
                _ => Err(invalid("expected a string or null")),
            },
            MutableTaskField::DueDate => match value {
                Value::Null => Ok(Self::DueDate(None)),
                Value::String(raw) => parse_due_date(raw)
                    .map(|due| Self::DueDate(Some(due)))
                    .ok_or_else(|| invalid("expected an RFC 3339 timestamp or YYYY-MM-DD date")),
                _ => Err(invalid("expected a string or null")),
            },
            MutableTaskField::Priority => match value {
                Value::Null => Ok(Self::Priority(None)),
                Value::String(raw) => Priority::try_from(raw.as_str())
                    .map(|priority| Self::Priority(Some(priority)))
                    .map_err(|err| invalid(&err.to_string())),
                _ => Err(invalid("expected a string or null")),
            },
        }
    }
}

fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}
