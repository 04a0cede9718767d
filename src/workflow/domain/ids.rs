//! Identifier and validated scalar types for the workflow domain.

use super::WorkflowDomainError;
use crate::ids::uuid_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_identifier! {
    /// Identifier of a workflow, shared by all of its versions.
    WorkflowId
}

uuid_identifier! {
    /// Identifier of a status row within one workflow version.
    StatusId
}

uuid_identifier! {
    /// Identifier of a transition row within one workflow version.
    ///
    /// Republishing a workflow assigns fresh transition identifiers; use
    /// [`TransitionKey`] for references that survive edits.
    TransitionId
}

/// Monotonically increasing workflow version number, starting at one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WorkflowVersion(u32);

impl WorkflowVersion {
    /// The version assigned when a workflow is first published.
    pub const FIRST: Self = Self(1);

    /// Creates a validated version number.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidVersion`] for zero.
    pub const fn new(value: u32) -> Result<Self, WorkflowDomainError> {
        if value == 0 {
            return Err(WorkflowDomainError::InvalidVersion(value));
        }
        Ok(Self(value))
    }

    /// Returns the version that follows this one.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::VersionOverflow`] at `u32::MAX`.
    pub const fn next(self) -> Result<Self, WorkflowDomainError> {
        match self.0.checked_add(1) {
            Some(value) => Ok(Self(value)),
            None => Err(WorkflowDomainError::VersionOverflow),
        }
    }

    /// Returns the underlying number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for WorkflowVersion {
    type Error = WorkflowDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkflowVersion> for u32 {
    fn from(version: WorkflowVersion) -> Self {
        version.0
    }
}

impl fmt::Display for WorkflowVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

fn validated_key(raw: String) -> Result<String, WorkflowDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(WorkflowDomainError::InvalidKey(raw));
    }
    Ok(trimmed.to_owned())
}

/// Stable transition key, unchanged across workflow versions.
///
/// # Examples
///
/// ```
/// use switchyard::workflow::domain::TransitionKey;
///
/// let key = TransitionKey::new(" send_to_review ").expect("valid key");
/// assert_eq!(key.as_str(), "send_to_review");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransitionKey(String);

impl TransitionKey {
    /// Creates a validated transition key.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidKey`] when the key is blank or
    /// contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        validated_key(value.into()).map(Self)
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TransitionKey {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TransitionKey> for String {
    fn from(key: TransitionKey) -> Self {
        key.0
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable status key, used by drafts to wire transitions to statuses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusKey(String);

impl StatusKey {
    /// Creates a validated status key.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidKey`] when the key is blank or
    /// contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        validated_key(value.into()).map(Self)
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StatusKey {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StatusKey> for String {
    fn from(key: StatusKey) -> Self {
        key.0
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the simple status shown by legacy board and list views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacyStatusId(String);

impl LegacyStatusId {
    /// Wraps a legacy status identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LegacyStatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
