//! Domain model for workflow definitions.
//!
//! Raw, loosely-typed authoring payloads ([`WorkflowDraft`]) are decoded
//! exactly once, at publish time, into closed types: role requirements,
//! required fields, [`Validator`]s, and [`PostFunction`]s. Evaluation code
//! downstream matches on these types and never inspects strings.

mod conditions;
mod definition;
mod digest;
mod draft;
mod error;
mod ids;
mod post_function;
mod status;
mod transition;
mod validator;

pub use conditions::{RoleRequirement, TransitionConditions};
pub use definition::{PersistedWorkflowData, PublishTarget, WorkflowDefinition};
pub use digest::WorkflowDigest;
pub use draft::{ConditionsDraft, StatusDraft, TransitionDraft, WorkflowDraft};
pub use error::WorkflowDomainError;
pub use ids::{
    LegacyStatusId, StatusId, StatusKey, TransitionId, TransitionKey, WorkflowId, WorkflowVersion,
};
pub use post_function::{NotifyRecipient, PostFunction, SetFieldTarget};
pub use status::{StatusCategory, WorkflowStatus};
pub use transition::{Transition, TransitionSelector, UiTrigger};
pub use validator::Validator;
