//! Then steps for workflow transition BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;
use switchyard::recommendation::scorer::MIN_CONFIDENCE;
use switchyard::task::ports::TaskStore;
use switchyard::transition::domain::TransitionError;

fn current_status_matches(world: &WorkflowWorld, status: &str) -> Result<(), eyre::Report> {
    let expected = world.status_id(status)?;
    let task_id = world.stored_task_id()?;
    let task = run_async(world.tasks.find_by_id(task_id))
        .wrap_err("reload scenario task")?
        .ok_or_else(|| eyre!("scenario task disappeared"))?;
    if task.workflow_status_id() != expected {
        return Err(eyre!(
            "expected status {status}, found {}",
            task.workflow_status_id()
        ));
    }
    Ok(())
}

#[then(r#"the task remains in status "{status}""#)]
fn task_remains_in_status(world: &WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    current_status_matches(world, &status)
}

#[then(r#"the task is in status "{status}""#)]
fn task_is_in_status(world: &WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing transition result"))?;
    if let Err(err) = result {
        return Err(eyre!("expected the transition to commit, got {err}"));
    }
    current_status_matches(world, &status)
}

#[then("the transition is denied")]
fn transition_is_denied(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing transition result"))?;
    if !matches!(result, Err(TransitionError::PermissionDenied { .. })) {
        return Err(eyre!("expected PermissionDenied, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the transition fails naming field "{field}""#)]
fn transition_fails_naming_field(world: &WorkflowWorld, field: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing transition result"))?;
    match result {
        Err(TransitionError::ValidationFailed { field: missing }) if *missing == field => Ok(()),
        other => Err(eyre!("expected ValidationFailed naming {field}, got {other:?}")),
    }
}

#[then("the transition is rejected by a validator")]
fn transition_rejected_by_validator(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing transition result"))?;
    if !matches!(result, Err(TransitionError::ValidatorRejected { .. })) {
        return Err(eyre!("expected ValidatorRejected, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the suggested transition is "{transition_key}""#)]
fn suggested_transition_is(
    world: &WorkflowWorld,
    transition_key: String,
) -> Result<(), eyre::Report> {
    let suggestion = world
        .last_suggestion
        .as_ref()
        .ok_or_else(|| eyre!("missing suggestion result"))?
        .as_ref()
        .ok_or_else(|| eyre!("expected a suggestion, got none"))?;
    if suggestion.transition_key.as_str() != transition_key {
        return Err(eyre!(
            "expected suggestion {transition_key}, got {}",
            suggestion.transition_key
        ));
    }
    Ok(())
}

#[then("the suggestion is confident enough to show")]
fn suggestion_is_confident(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let suggestion = world
        .last_suggestion
        .as_ref()
        .and_then(Option::as_ref)
        .ok_or_else(|| eyre!("expected a suggestion"))?;
    if suggestion.confidence < MIN_CONFIDENCE {
        return Err(eyre!("confidence {} is below the threshold", suggestion.confidence));
    }
    Ok(())
}
