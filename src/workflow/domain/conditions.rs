//! Requester and data conditions attached to a transition.

use super::WorkflowDomainError;
use crate::token;
use crate::access::domain::SpaceRole;
use crate::task::domain::TaskField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a transition's role list.
///
/// # Examples
///
/// ```
/// use switchyard::workflow::domain::RoleRequirement;
///
/// assert_eq!(RoleRequirement::parse("any"), Ok(RoleRequirement::Any));
/// assert_eq!(RoleRequirement::parse("ASSIGNEE"), Ok(RoleRequirement::Assignee));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoleRequirement {
    /// Wildcard: anyone may perform the transition.
    Any,
    /// The task's current assignee may perform the transition.
    Assignee,
    /// A privileged system identity may perform the transition.
    SystemAdmin,
    /// Holders of the named space role may perform the transition.
    Role(SpaceRole),
}

impl RoleRequirement {
    /// Decodes a role-list entry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidRoleRequirement`] when the entry
    /// is neither a marker nor a valid space role.
    pub fn parse(raw: &str) -> Result<Self, WorkflowDomainError> {
        if raw.trim() == "*" {
            return Ok(Self::Any);
        }
        match token::fold(raw).as_str() {
            "ANY" => Ok(Self::Any),
            "ASSIGNEE" => Ok(Self::Assignee),
            "SYSTEMADMIN" => Ok(Self::SystemAdmin),
            _ => SpaceRole::new(raw)
                .map(Self::Role)
                .map_err(|_| WorkflowDomainError::InvalidRoleRequirement(raw.to_owned())),
        }
    }

    /// Returns the canonical configuration form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "ANY",
            Self::Assignee => "ASSIGNEE",
            Self::SystemAdmin => "SYSTEM_ADMIN",
            Self::Role(role) => role.as_str(),
        }
    }
}

impl TryFrom<String> for RoleRequirement {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoleRequirement> for String {
    fn from(requirement: RoleRequirement) -> Self {
        requirement.as_str().to_owned()
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role and field conditions gating a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConditions {
    roles: Vec<RoleRequirement>,
    required_fields: Vec<TaskField>,
    template_fields: Vec<String>,
}

impl TransitionConditions {
    /// Creates conditions that admit everyone and require no fields.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Sets the role list.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleRequirement>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Sets the required standard task fields, in evaluation order.
    #[must_use]
    pub fn with_required_fields(mut self, fields: impl IntoIterator<Item = TaskField>) -> Self {
        self.required_fields = fields.into_iter().collect();
        self
    }

    /// Sets the required custom-field keys, in evaluation order.
    #[must_use]
    pub fn with_template_fields(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.template_fields = keys.into_iter().collect();
        self
    }

    /// Returns the role list in declaration order.
    #[must_use]
    pub fn roles(&self) -> &[RoleRequirement] {
        &self.roles
    }

    /// Returns the required standard task fields in declaration order.
    #[must_use]
    pub fn required_fields(&self) -> &[TaskField] {
        &self.required_fields
    }

    /// Returns the required custom-field keys in declaration order.
    #[must_use]
    pub fn template_fields(&self) -> &[String] {
        &self.template_fields
    }

    /// Returns `true` when the role list admits every requester.
    #[must_use]
    pub fn is_open_to_all(&self) -> bool {
        self.roles.is_empty() || self.roles.contains(&RoleRequirement::Any)
    }

    /// Returns `true` when the role list contains the privileged marker.
    #[must_use]
    pub fn admits_privileged(&self) -> bool {
        self.roles.contains(&RoleRequirement::SystemAdmin)
    }
}
