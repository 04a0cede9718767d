//! Space role names.

use super::AccessDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a user holds within a space, normalized to upper case.
///
/// # Examples
///
/// ```
/// use switchyard::access::domain::SpaceRole;
///
/// let role = SpaceRole::new(" admin ").expect("valid role");
/// assert_eq!(role.as_str(), "ADMIN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpaceRole(String);

impl SpaceRole {
    /// Creates a validated role name.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDomainError::EmptyRole`] for blank input and
    /// [`AccessDomainError::InvalidRole`] when the name contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, AccessDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccessDomainError::EmptyRole);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(AccessDomainError::InvalidRole(raw));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the normalized role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SpaceRole {
    type Error = AccessDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpaceRole> for String {
    fn from(role: SpaceRole) -> Self {
        role.0
    }
}

impl AsRef<str> for SpaceRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SpaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
