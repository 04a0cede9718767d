//! Workflow version storage against `PostgreSQL`.

use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use switchyard::workflow::{
    domain::{PublishTarget, TransitionDraft, WorkflowDefinition, WorkflowVersion},
    ports::{WorkflowRepository, WorkflowRepositoryError},
};

use super::helpers::{PostgresHarness, review_draft};

#[rstest]
fn storing_a_version_twice_is_a_duplicate(shared_test_cluster: &'static TestCluster) {
    let harness =
        PostgresHarness::new(shared_test_cluster, "duplicate_version").expect("harness setup");
    let workflow = harness.store_workflow().expect("workflow stored");

    let err = harness
        .runtime
        .block_on(harness.workflows.store_version(&workflow))
        .expect_err("version already stored");

    assert!(matches!(
        err,
        WorkflowRepositoryError::DuplicateVersion { workflow_id, version }
            if workflow_id == workflow.id() && version == WorkflowVersion::FIRST
    ));
}

#[rstest]
fn versions_are_found_exactly_and_latest_is_highest(shared_test_cluster: &'static TestCluster) {
    let harness = PostgresHarness::new(shared_test_cluster, "version_lookup").expect("harness setup");
    let first = harness.store_workflow().expect("workflow stored");
    let second = WorkflowDefinition::publish(
        &review_draft().with_transition(TransitionDraft::new("REOPEN", "Reopen", "DONE", "OPEN")),
        PublishTarget {
            workflow_id: first.id(),
            space_id: first.space_id(),
            version: first.version().next().expect("next version"),
        },
        &DefaultClock,
    )
    .expect("second draft publishes");
    harness
        .runtime
        .block_on(harness.workflows.store_version(&second))
        .expect("second version stored");

    let found = harness
        .runtime
        .block_on(harness.workflows.find_version(first.id(), WorkflowVersion::FIRST))
        .expect("lookup should succeed")
        .expect("version 1 exists");
    assert_eq!(found.digest(), first.digest());
    assert_eq!(found.transitions().len(), 2);

    let latest = harness
        .runtime
        .block_on(harness.workflows.latest_version(first.id()))
        .expect("lookup should succeed")
        .expect("workflow exists");
    assert_eq!(latest.version().value(), 2);
    assert_eq!(latest.transitions().len(), 3);
}
