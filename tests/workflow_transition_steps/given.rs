//! Given steps for workflow transition BDD scenarios.

use super::world::{WorkflowWorld, delivery_draft, run_async};
use chrono::Utc;
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use switchyard::access::domain::SpaceRole;
use switchyard::task::domain::{Subtask, Task};
use switchyard::workflow::services::PublishWorkflowRequest;

#[given("the delivery workflow is published")]
fn delivery_workflow_published(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let published = run_async(
        world
            .definitions
            .publish(PublishWorkflowRequest::new(world.space_id, delivery_draft())),
    )
    .wrap_err("publish delivery workflow")?;
    world.workflow = Some(published);
    Ok(())
}

#[given(r#"a task in status "{status}""#)]
fn task_in_status(world: &mut WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let mut binding = world
        .workflow()?
        .initial_binding()
        .ok_or_else(|| eyre!("workflow has no statuses"))?;
    binding.status_id = world.status_id(&status)?;
    let task = Task::new(world.space_id, "Publish changelog", binding, &DefaultClock)
        .wrap_err("build scenario task")?;
    world.pending_task = Some(task);
    Ok(())
}

#[given("the task has a due date")]
fn task_has_due_date(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let task = world
        .pending_task
        .take()
        .ok_or_else(|| eyre!("missing pending task in scenario world"))?;
    world.pending_task = Some(task.with_due_date(Utc::now()));
    Ok(())
}

#[given(r#"the task has an open subtask "{title}""#)]
fn task_has_open_subtask(world: &mut WorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let task = world
        .pending_task
        .take()
        .ok_or_else(|| eyre!("missing pending task in scenario world"))?;
    let subtask = Subtask::new(title);
    world.subtask_id = Some(subtask.id());
    world.pending_task = Some(task.with_subtask(subtask));
    Ok(())
}

#[given(r#"the requester holds space role "{role}""#)]
fn requester_holds_role(world: &mut WorkflowWorld, role: String) -> Result<(), eyre::Report> {
    let space_role = SpaceRole::new(role).wrap_err("parse space role")?;
    world
        .roles
        .grant(world.space_id, world.requester, space_role)
        .wrap_err("grant space role")
}
