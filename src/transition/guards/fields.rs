//! Required-field gating.

use super::GuardFailure;
use crate::task::domain::Task;
use crate::workflow::domain::TransitionConditions;

/// Checks required task fields, then required custom-field keys, each in
/// declaration order.
///
/// # Errors
///
/// Returns [`GuardFailure::MissingField`] naming the first empty field.
pub fn check_required_fields(
    conditions: &TransitionConditions,
    task: &Task,
) -> Result<(), GuardFailure> {
    if let Some(field) = conditions
        .required_fields()
        .iter()
        .find(|field| !task.has_field(**field))
    {
        return Err(GuardFailure::MissingField(field.as_str().to_owned()));
    }
    if let Some(key) = conditions
        .template_fields()
        .iter()
        .find(|key| !task.has_custom_value(key))
    {
        return Err(GuardFailure::MissingField(key.clone()));
    }
    Ok(())
}
