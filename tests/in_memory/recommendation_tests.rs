//! Suggestions over stored tasks and their history.

use super::helpers::{Engine, by_key, delivery_draft, engine};
use rstest::rstest;
use switchyard::access::domain::UserId;
use switchyard::recommendation::{scorer::MIN_CONFIDENCE, services::SuggestionRequest};
use switchyard::task::domain::TaskId;
use switchyard::transition::services::PerformTransitionRequest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn role_gated_shortcut_is_never_suggested(engine: Engine) -> Result<(), eyre::Report> {
    let workflow = engine.publish(delivery_draft()).await?;
    let task = engine.create_task(&workflow, |task| task).await?;
    engine.grant(UserId::new(), "MEMBER")?;

    let suggestion = engine
        .suggestions()
        .suggest(SuggestionRequest::Task(task.id()))
        .await?
        .ok_or_else(|| eyre::eyre!("expected a suggestion"))?;

    eyre::ensure!(suggestion.transition_key.as_str() == "SEND_TO_REVIEW");
    eyre::ensure!(suggestion.confidence >= MIN_CONFIDENCE);
    eyre::ensure!(!suggestion.rationale.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suggestions_follow_the_task(engine: Engine) -> Result<(), eyre::Report> {
    let workflow = engine.publish(delivery_draft()).await?;
    let task = engine.create_task(&workflow, |task| task).await?;
    engine
        .executor()
        .perform_transition(PerformTransitionRequest::new(
            task.id(),
            by_key("SEND_TO_REVIEW")?,
            UserId::new(),
        ))
        .await?;

    let suggestion = engine
        .suggestions()
        .suggest_for_task(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("expected a suggestion"))?;

    eyre::ensure!(suggestion.transition_key.as_str() == "APPROVE");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn final_status_has_nothing_to_suggest(engine: Engine) -> Result<(), eyre::Report> {
    let workflow = engine.publish(delivery_draft()).await?;
    let task = engine.create_task(&workflow, |task| task).await?;
    let admin = UserId::new();
    engine.grant(admin, "ADMIN")?;
    engine
        .executor()
        .perform_transition(PerformTransitionRequest::new(task.id(), by_key("CLOSE")?, admin))
        .await?;

    let suggestion = engine.suggestions().suggest_for_task(task.id()).await?;
    eyre::ensure!(suggestion.is_none(), "unexpected suggestion {suggestion:?}");

    let missing = engine.suggestions().suggest_for_task(TaskId::new()).await;
    eyre::ensure!(missing.is_err());
    Ok(())
}
