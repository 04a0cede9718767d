//! End-to-end transition tests over in-memory adapters.

use super::helpers::{Engine, by_key, delivery_draft, engine, status_id};
use chrono::Utc;
use rstest::rstest;
use switchyard::access::domain::UserId;
use switchyard::task::domain::Subtask;
use switchyard::transition::{
    domain::{AttemptPhase, TransitionError},
    services::PerformTransitionRequest,
};
use switchyard::workflow::domain::LegacyStatusId;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_then_approve_walks_the_workflow(engine: Engine) -> Result<(), eyre::Report> {
    let workflow = engine.publish(delivery_draft()).await?;
    let task = engine
        .create_task(&workflow, |task| task.with_due_date(Utc::now()))
        .await?;
    let author = UserId::new();
    let executor = engine.executor();

    let to_review = executor
        .perform_transition(PerformTransitionRequest::new(
            task.id(),
            by_key("SEND_TO_REVIEW")?,
            author,
        ))
        .await?;
    eyre::ensure!(to_review.new_status_id == status_id(&workflow, "REVIEW")?);

    let approved = executor
        .perform_transition(PerformTransitionRequest::new(
            task.id(),
            by_key("APPROVE")?,
            author,
        ))
        .await?;
    eyre::ensure!(approved.phase == AttemptPhase::Committed);
    eyre::ensure!(approved.workflow_status.is_final());

    let stored = engine.reload(task.id()).await?;
    eyre::ensure!(stored.workflow_status_id() == status_id(&workflow, "DONE")?);
    eyre::ensure!(stored.legacy_status_id() == Some(&LegacyStatusId::new("closed")));

    let history = engine.activity.records()?;
    eyre::ensure!(history.len() == 2, "expected two history records, got {}", history.len());
    let sent = engine.notifier.sent()?;
    eyre::ensure!(
        sent.first().and_then(|intent| intent.subject.as_deref()) == Some("Ship release notes approved"),
        "unexpected notifications: {sent:?}"
    );
    Ok(())
}

#[rstest]
#[case::member("MEMBER", false)]
#[case::admin("ADMIN", true)]
#[tokio::test(flavor = "multi_thread")]
async fn close_shortcut_is_role_gated(
    engine: Engine,
    #[case] role: &str,
    #[case] allowed: bool,
) -> Result<(), eyre::Report> {
    let workflow = engine.publish(delivery_draft()).await?;
    let task = engine.create_task(&workflow, |task| task).await?;
    let requester = UserId::new();
    engine.grant(requester, role)?;

    let result = engine
        .executor()
        .perform_transition(PerformTransitionRequest::new(
            task.id(),
            by_key("CLOSE")?,
            requester,
        ))
        .await;

    let stored = engine.reload(task.id()).await?;
    if allowed {
        eyre::ensure!(result.is_ok(), "admin close failed: {result:?}");
        eyre::ensure!(stored.workflow_status_id() == status_id(&workflow, "DONE")?);
    } else {
        eyre::ensure!(
            matches!(result, Err(TransitionError::PermissionDenied { .. })),
            "expected PermissionDenied, got {result:?}"
        );
        eyre::ensure!(stored == task, "a denied attempt must not touch the task");
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guard_failures_leave_the_task_unchanged(engine: Engine) -> Result<(), eyre::Report> {
    let workflow = engine.publish(delivery_draft()).await?;
    let task = engine
        .create_task(&workflow, |task| task.with_subtask(Subtask::new("Proofread")))
        .await?;
    let requester = UserId::new();
    let executor = engine.executor();
    executor
        .perform_transition(PerformTransitionRequest::new(
            task.id(),
            by_key("SEND_TO_REVIEW")?,
            requester,
        ))
        .await?;
    let in_review = engine.reload(task.id()).await?;

    let missing_due_date = executor
        .perform_transition(PerformTransitionRequest::new(
            task.id(),
            by_key("APPROVE")?,
            requester,
        ))
        .await;
    eyre::ensure!(
        matches!(&missing_due_date, Err(TransitionError::ValidationFailed { field }) if field == "dueDate"),
        "expected ValidationFailed on dueDate, got {missing_due_date:?}"
    );
    eyre::ensure!(engine.reload(task.id()).await? == in_review);
    eyre::ensure!(engine.activity.records()?.len() == 1);
    Ok(())
}
