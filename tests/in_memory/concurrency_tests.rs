//! Racing transition attempts on one task.

use std::sync::Arc;

use super::helpers::{Engine, by_key, engine, status_id};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rstest::rstest;
use switchyard::access::domain::UserId;
use switchyard::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Task, TaskFieldUpdate, TaskId},
    ports::{StatusChange, TaskStore, TaskStoreResult},
};
use switchyard::transition::{domain::TransitionError, services::PerformTransitionRequest};
use switchyard::workflow::domain::{StatusDraft, TransitionDraft, WorkflowDraft};
use tokio::sync::Barrier;

/// Holds every conditional write until both attempts have reached it, so
/// both race on the same observed status.
struct GatedStore {
    inner: Arc<InMemoryTaskStore>,
    gate: Barrier,
}

#[async_trait]
impl TaskStore for GatedStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        self.inner.store(task).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn compare_and_set_status(&self, change: &StatusChange) -> TaskStoreResult<Task> {
        self.gate.wait().await;
        self.inner.compare_and_set_status(change).await
    }

    async fn apply_updates(
        &self,
        id: TaskId,
        updates: &[TaskFieldUpdate],
        updated_at: DateTime<Utc>,
    ) -> TaskStoreResult<Task> {
        self.inner.apply_updates(id, updates, updated_at).await
    }
}

fn fork_draft() -> WorkflowDraft {
    WorkflowDraft::new("Fork")
        .with_status(StatusDraft::new("A", "Triage", "todo"))
        .with_status(StatusDraft::new("B", "Accepted", "in_progress"))
        .with_status(StatusDraft::new("C", "Rejected", "done"))
        .with_transition(TransitionDraft::new("ACCEPT", "Accept", "A", "B"))
        .with_transition(TransitionDraft::new("REJECT", "Reject", "A", "C"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn exactly_one_of_two_racing_attempts_wins(engine: Engine) -> Result<(), eyre::Report> {
    let workflow = engine.publish(fork_draft()).await?;
    let task = engine.create_task(&workflow, |task| task).await?;
    let gated = Arc::new(GatedStore {
        inner: Arc::clone(&engine.tasks),
        gate: Barrier::new(2),
    });
    let executor = Arc::new(engine.executor_over(gated));

    let accept = {
        let racer = Arc::clone(&executor);
        let request = PerformTransitionRequest::new(task.id(), by_key("ACCEPT")?, UserId::new());
        tokio::spawn(async move { racer.perform_transition(request).await })
    };
    let reject = {
        let racer = Arc::clone(&executor);
        let request = PerformTransitionRequest::new(task.id(), by_key("REJECT")?, UserId::new());
        tokio::spawn(async move { racer.perform_transition(request).await })
    };
    let outcomes = [accept.await?, reject.await?];

    let winners: Vec<_> = outcomes.iter().filter_map(|outcome| outcome.as_ref().ok()).collect();
    let losers: Vec<_> = outcomes.iter().filter_map(|outcome| outcome.as_ref().err()).collect();
    eyre::ensure!(winners.len() == 1, "expected one winner, got {outcomes:?}");
    eyre::ensure!(
        matches!(losers.as_slice(), [TransitionError::ConcurrentModification { .. }]),
        "expected one ConcurrentModification, got {losers:?}"
    );

    let final_status = engine.reload(task.id()).await?.workflow_status_id();
    let winner = winners
        .first()
        .ok_or_else(|| eyre::eyre!("missing winner"))?;
    eyre::ensure!(final_status == winner.new_status_id);
    eyre::ensure!(
        final_status == status_id(&workflow, "B")? || final_status == status_id(&workflow, "C")?
    );
    eyre::ensure!(engine.activity.records()?.len() == 1, "only the winner records history");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attempts_on_different_tasks_do_not_contend(engine: Engine) -> Result<(), eyre::Report> {
    let workflow = engine.publish(fork_draft()).await?;
    let first = engine.create_task(&workflow, |task| task).await?;
    let second = engine.create_task(&workflow, |task| task).await?;
    let gated = Arc::new(GatedStore {
        inner: Arc::clone(&engine.tasks),
        gate: Barrier::new(2),
    });
    let executor = Arc::new(engine.executor_over(gated));

    let handles = [(first.id(), "ACCEPT"), (second.id(), "REJECT")].map(|(task_id, key)| {
        let worker = Arc::clone(&executor);
        let selector = by_key(key);
        tokio::spawn(async move {
            let request = PerformTransitionRequest::new(task_id, selector?, UserId::new());
            worker
                .perform_transition(request)
                .await
                .map_err(eyre::Report::from)
        })
    });
    for handle in handles {
        handle.await??;
    }

    eyre::ensure!(engine.reload(first.id()).await?.workflow_status_id() == status_id(&workflow, "B")?);
    eyre::ensure!(engine.reload(second.id()).await?.workflow_status_id() == status_id(&workflow, "C")?);
    Ok(())
}
