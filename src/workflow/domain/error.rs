//! Error types for workflow definition decoding and validation.

use super::{StatusKey, TransitionKey};
use thiserror::Error;

/// Errors returned while decoding or validating workflow definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// A workflow, status, or transition name is blank.
    #[error("{entity} name must not be empty")]
    EmptyName {
        /// The kind of entity whose name was blank.
        entity: &'static str,
    },

    /// A status or transition key is blank or contains whitespace.
    #[error("invalid key '{0}', expected a non-empty token without whitespace")]
    InvalidKey(String),

    /// Workflow versions start at one.
    #[error("invalid workflow version {0}, expected a positive integer")]
    InvalidVersion(u32),

    /// The next version number would overflow.
    #[error("workflow version counter exhausted")]
    VersionOverflow,

    /// The workflow declares no statuses.
    #[error("workflow must declare at least one status")]
    NoStatuses,

    /// Two statuses share a key.
    #[error("duplicate status key: {0}")]
    DuplicateStatusKey(StatusKey),

    /// Two transitions share a key.
    #[error("duplicate transition key: {0}")]
    DuplicateTransitionKey(TransitionKey),

    /// A transition references a status key absent from the workflow.
    #[error("transition '{transition}' references unknown status '{status}'")]
    UnknownStatusKey {
        /// The transition holding the dangling reference.
        transition: TransitionKey,
        /// The unresolved status key.
        status: String,
    },

    /// The status category is not one of the supported categories.
    #[error("unknown status category: {0}")]
    UnknownStatusCategory(String),

    /// The UI trigger hint is not recognised.
    #[error("unknown ui trigger: {0}")]
    UnknownUiTrigger(String),

    /// A role requirement could not be decoded.
    #[error("invalid role requirement: {0}")]
    InvalidRoleRequirement(String),

    /// A required-field entry names no known task field.
    #[error("unknown task field: {0}")]
    UnknownTaskField(String),

    /// A validator name is not recognised.
    #[error("unknown validator: {0}")]
    UnknownValidator(String),

    /// A post-function entry has a recognised type but a malformed payload.
    #[error("malformed post-function at index {index}: {reason}")]
    MalformedPostFunction {
        /// Position of the action in its transition's list.
        index: usize,
        /// Description of the decoding failure.
        reason: String,
    },

    /// A notification recipient could not be decoded.
    #[error("invalid notification recipient: {0}")]
    InvalidRecipient(String),

    /// The draft could not be serialized for digesting.
    #[error("failed to canonicalize workflow draft: {0}")]
    Canonicalization(String),

    /// Neither a transition id nor a transition key was supplied.
    #[error("a transition id or transition key is required")]
    MissingTransitionSelector,
}
