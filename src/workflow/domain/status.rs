//! Workflow status nodes.

use super::{LegacyStatusId, StatusId, StatusKey, WorkflowDomainError};
use crate::token;
use serde::{Deserialize, Serialize};

/// Coarse grouping of statuses shared by every workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// Work has not started.
    Todo,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Done,
}

impl StatusCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for StatusCategory {
    type Error = WorkflowDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match token::fold(value).as_str() {
            "TODO" => Ok(Self::Todo),
            "INPROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(WorkflowDomainError::UnknownStatusCategory(value.to_owned())),
        }
    }
}

/// A named state that tasks can occupy within one workflow version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    id: StatusId,
    key: StatusKey,
    name: String,
    category: StatusCategory,
    is_final: bool,
    legacy_status_id: Option<LegacyStatusId>,
}

impl WorkflowStatus {
    /// Creates a status with a freshly assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when `name` is blank.
    pub fn new(
        key: StatusKey,
        name: impl Into<String>,
        category: StatusCategory,
    ) -> Result<Self, WorkflowDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(WorkflowDomainError::EmptyName { entity: "status" });
        }
        Ok(Self {
            id: StatusId::new(),
            key,
            name: trimmed.to_owned(),
            category,
            is_final: false,
            legacy_status_id: None,
        })
    }

    /// Marks the status as final.
    #[must_use]
    pub const fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    /// Maps the status to a legacy simple status.
    #[must_use]
    pub fn with_legacy_status(mut self, legacy: LegacyStatusId) -> Self {
        self.legacy_status_id = Some(legacy);
        self
    }

    /// Returns the status identifier.
    #[must_use]
    pub const fn id(&self) -> StatusId {
        self.id
    }

    /// Returns the version-independent status key.
    #[must_use]
    pub const fn key(&self) -> &StatusKey {
        &self.key
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the status category.
    #[must_use]
    pub const fn category(&self) -> StatusCategory {
        self.category
    }

    /// Returns `true` when the status ends the workflow.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.is_final
    }

    /// Returns the mapped legacy status, if any.
    #[must_use]
    pub const fn legacy_status_id(&self) -> Option<&LegacyStatusId> {
        self.legacy_status_id.as_ref()
    }
}
