//! Error types for access value construction.

use thiserror::Error;

/// Errors returned while constructing access domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDomainError {
    /// The role name is empty after trimming.
    #[error("space role must not be empty")]
    EmptyRole,

    /// The role name contains whitespace.
    #[error("invalid space role '{0}', expected a single token")]
    InvalidRole(String),
}
