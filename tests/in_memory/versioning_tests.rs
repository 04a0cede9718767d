//! Republishing workflows while tasks are in flight.

use super::helpers::{Engine, by_key, delivery_draft, engine, status_id};
use rstest::rstest;
use switchyard::access::domain::UserId;
use switchyard::transition::{
    domain::{MissingEntity, TransitionError},
    services::PerformTransitionRequest,
};
use switchyard::workflow::domain::{TransitionDraft, WorkflowVersion};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_stay_on_their_bound_version(engine: Engine) -> Result<(), eyre::Report> {
    let first = engine.publish(delivery_draft()).await?;
    let pinned = engine.create_task(&first, |task| task).await?;

    let revised = delivery_draft().with_transition(TransitionDraft::new(
        "SKIP_REVIEW",
        "Skip review",
        "OPEN",
        "DONE",
    ));
    let second = engine.republish(first.id(), revised).await?;
    eyre::ensure!(second.version() == WorkflowVersion::FIRST.next()?);
    let fresh = engine.create_task(&second, |task| task).await?;
    let requester = UserId::new();
    let executor = engine.executor();

    let pinned_result = executor
        .perform_transition(PerformTransitionRequest::new(
            pinned.id(),
            by_key("SKIP_REVIEW")?,
            requester,
        ))
        .await;
    eyre::ensure!(
        matches!(pinned_result, Err(TransitionError::NotFound(MissingEntity::Transition(_)))),
        "v1 task must not see v2 transitions, got {pinned_result:?}"
    );

    let fresh_receipt = executor
        .perform_transition(PerformTransitionRequest::new(
            fresh.id(),
            by_key("SKIP_REVIEW")?,
            requester,
        ))
        .await?;
    eyre::ensure!(fresh_receipt.new_status_id == status_id(&second, "DONE")?);

    let pinned_receipt = executor
        .perform_transition(PerformTransitionRequest::new(
            pinned.id(),
            by_key("SEND_TO_REVIEW")?,
            requester,
        ))
        .await?;
    eyre::ensure!(pinned_receipt.new_status_id == status_id(&first, "REVIEW")?);
    eyre::ensure!(engine.reload(pinned.id()).await?.binding().version == WorkflowVersion::FIRST);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn republishing_an_identical_draft_keeps_the_version(
    engine: Engine,
) -> Result<(), eyre::Report> {
    let first = engine.publish(delivery_draft()).await?;
    let again = engine.republish(first.id(), delivery_draft()).await?;

    eyre::ensure!(again == first, "identical drafts must not create a new version");
    Ok(())
}
