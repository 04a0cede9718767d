//! Structural validators evaluated against the task before a transition.

use super::WorkflowDomainError;
use crate::token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data invariant a task must satisfy before a transition may apply.
///
/// Validators describe the task, never the requester. A rejection can be
/// fixed by changing task data and retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Validator {
    /// Every subtask must be done.
    NoOpenSubtasks,
}

impl Validator {
    /// Decodes a validator from its configured name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::UnknownValidator`] for names that do
    /// not identify a validator.
    pub fn parse(raw: &str) -> Result<Self, WorkflowDomainError> {
        match token::fold(raw).as_str() {
            "NOOPENSUBTASKS" => Ok(Self::NoOpenSubtasks),
            _ => Err(WorkflowDomainError::UnknownValidator(raw.to_owned())),
        }
    }

    /// Returns the canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoOpenSubtasks => "NO_OPEN_SUBTASKS",
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
