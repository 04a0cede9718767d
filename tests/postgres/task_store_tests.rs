//! Conditional status writes and field updates against `PostgreSQL`.

use chrono::Utc;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use switchyard::task::{
    domain::{Priority, TaskFieldUpdate, TaskId},
    ports::{StatusChange, TaskStore, TaskStoreError},
};
use switchyard::workflow::domain::LegacyStatusId;

use super::helpers::{PostgresHarness, status_id};

#[rstest]
fn conditional_write_moves_the_task(shared_test_cluster: &'static TestCluster) {
    let harness = PostgresHarness::new(shared_test_cluster, "cas_win").expect("harness setup");
    let workflow = harness.store_workflow().expect("workflow stored");
    let task = harness.store_task(&workflow).expect("task stored");
    let done = status_id(&workflow, "DONE").expect("DONE exists");

    let moved = harness
        .runtime
        .block_on(harness.tasks.compare_and_set_status(&StatusChange {
            task_id: task.id(),
            expected_status_id: task.workflow_status_id(),
            new_status_id: done,
            legacy_status_id: Some(LegacyStatusId::new("closed")),
            updated_at: Utc::now(),
        }))
        .expect("write should apply");

    assert_eq!(moved.workflow_status_id(), done);
    assert_eq!(moved.legacy_status_id(), Some(&LegacyStatusId::new("closed")));
    let reloaded = harness
        .runtime
        .block_on(harness.tasks.find_by_id(task.id()))
        .expect("lookup should succeed")
        .expect("task exists");
    assert_eq!(reloaded.workflow_status_id(), done);
    assert_eq!(reloaded.binding().version, workflow.version());
}

#[rstest]
fn stale_expectation_is_a_conflict(shared_test_cluster: &'static TestCluster) {
    let harness = PostgresHarness::new(shared_test_cluster, "cas_loss").expect("harness setup");
    let workflow = harness.store_workflow().expect("workflow stored");
    let task = harness.store_task(&workflow).expect("task stored");
    let open = status_id(&workflow, "OPEN").expect("OPEN exists");
    let review = status_id(&workflow, "REVIEW").expect("REVIEW exists");
    let done = status_id(&workflow, "DONE").expect("DONE exists");

    harness
        .runtime
        .block_on(harness.tasks.compare_and_set_status(&StatusChange {
            task_id: task.id(),
            expected_status_id: open,
            new_status_id: review,
            legacy_status_id: None,
            updated_at: Utc::now(),
        }))
        .expect("first writer wins");

    let err = harness
        .runtime
        .block_on(harness.tasks.compare_and_set_status(&StatusChange {
            task_id: task.id(),
            expected_status_id: open,
            new_status_id: done,
            legacy_status_id: None,
            updated_at: Utc::now(),
        }))
        .expect_err("second writer saw a stale status");

    assert!(matches!(
        err,
        TaskStoreError::StatusConflict { task_id, expected, actual }
            if task_id == task.id() && expected == open && actual == review
    ));
    let reloaded = harness
        .runtime
        .block_on(harness.tasks.find_by_id(task.id()))
        .expect("lookup should succeed")
        .expect("task exists");
    assert_eq!(reloaded.workflow_status_id(), review);
    assert_eq!(reloaded.legacy_status_id(), None);
}

#[rstest]
fn conditional_write_on_missing_task_is_not_found(shared_test_cluster: &'static TestCluster) {
    let harness = PostgresHarness::new(shared_test_cluster, "cas_missing").expect("harness setup");
    let workflow = harness.store_workflow().expect("workflow stored");
    let missing = TaskId::new();

    let err = harness
        .runtime
        .block_on(harness.tasks.compare_and_set_status(&StatusChange {
            task_id: missing,
            expected_status_id: status_id(&workflow, "OPEN").expect("OPEN exists"),
            new_status_id: status_id(&workflow, "REVIEW").expect("REVIEW exists"),
            legacy_status_id: None,
            updated_at: Utc::now(),
        }))
        .expect_err("task does not exist");

    assert!(matches!(err, TaskStoreError::NotFound(id) if id == missing));
}

#[rstest]
fn field_updates_leave_workflow_status_alone(shared_test_cluster: &'static TestCluster) {
    let harness = PostgresHarness::new(shared_test_cluster, "apply_updates").expect("harness setup");
    let workflow = harness.store_workflow().expect("workflow stored");
    let task = harness.store_task(&workflow).expect("task stored");
    let review = status_id(&workflow, "REVIEW").expect("REVIEW exists");
    harness
        .runtime
        .block_on(harness.tasks.compare_and_set_status(&StatusChange {
            task_id: task.id(),
            expected_status_id: task.workflow_status_id(),
            new_status_id: review,
            legacy_status_id: None,
            updated_at: Utc::now(),
        }))
        .expect("move to review");

    let updated = harness
        .runtime
        .block_on(harness.tasks.apply_updates(
            task.id(),
            &[
                TaskFieldUpdate::Title("Rotate signing keys".to_owned()),
                TaskFieldUpdate::Priority(Some(Priority::Low)),
            ],
            Utc::now(),
        ))
        .expect("updates should apply");

    assert_eq!(updated.title(), "Rotate signing keys");
    assert_eq!(updated.priority(), Some(Priority::Low));
    assert_eq!(updated.workflow_status_id(), review);
    let reloaded = harness
        .runtime
        .block_on(harness.tasks.find_by_id(task.id()))
        .expect("lookup should succeed")
        .expect("task exists");
    assert_eq!(reloaded.workflow_status_id(), review);
    assert_eq!(reloaded.priority(), Some(Priority::Low));
}
