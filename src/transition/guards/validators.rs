//! Structural validators over the task.

use super::GuardFailure;
use crate::task::domain::Task;
use crate::workflow::domain::Validator;

/// Runs every validator in declaration order.
///
/// # Errors
///
/// Returns [`GuardFailure::ValidatorRejected`] for the first validator the
/// task fails.
pub fn check_validators(validators: &[Validator], task: &Task) -> Result<(), GuardFailure> {
    validators
        .iter()
        .try_for_each(|validator| check_validator(*validator, task))
}

fn check_validator(validator: Validator, task: &Task) -> Result<(), GuardFailure> {
    match validator {
        Validator::NoOpenSubtasks => {
            let open = task.open_subtasks().count();
            if open == 0 {
                Ok(())
            } else {
                Err(GuardFailure::ValidatorRejected {
                    validator,
                    reason: format!("{open} open subtask(s)"),
                })
            }
        }
    }
}
