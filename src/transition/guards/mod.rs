//! Pure guard evaluation over a [`TransitionContext`].
//!
//! Guards run in a fixed order and stop at the first failure: role gating,
//! then required fields, then validators. Identity checks are cheap and run
//! before data-dependent ones.

mod fields;
mod role;
mod validators;

pub use fields::check_required_fields;
pub use role::{RoleGrant, check_role};
pub use validators::check_validators;

use crate::transition::domain::{TransitionContext, TransitionError};
use crate::workflow::domain::Validator;

/// The first guard that refused an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardFailure {
    /// No entry of the role list matches the requester.
    PermissionDenied,
    /// A required field or template field is empty.
    MissingField(String),
    /// A validator rejected the task.
    ValidatorRejected {
        /// The failing validator.
        validator: Validator,
        /// Description of the offending data.
        reason: String,
    },
}

impl GuardFailure {
    /// Returns `true` when fixing task data can clear the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::PermissionDenied)
    }

    /// Converts the failure into the engine error for `context`.
    #[must_use]
    pub fn into_error(self, context: &TransitionContext) -> TransitionError {
        match self {
            Self::PermissionDenied => TransitionError::PermissionDenied {
                user_id: context.requester().user_id(),
                transition: context.transition().key().clone(),
            },
            Self::MissingField(field) => TransitionError::ValidationFailed { field },
            Self::ValidatorRejected { validator, reason } => {
                TransitionError::ValidatorRejected { validator, reason }
            }
        }
    }
}

/// Runs every guard family in order.
///
/// Returns how the role gate was satisfied so the executor can re-verify a
/// privileged grant before writing.
///
/// # Errors
///
/// Returns the first [`GuardFailure`].
pub fn evaluate(context: &TransitionContext) -> Result<RoleGrant, GuardFailure> {
    let grant = check_role(context.transition().conditions(), context.requester())?;
    check_required_fields(context.transition().conditions(), context.task())?;
    check_validators(context.transition().validators(), context.task())?;
    Ok(grant)
}
