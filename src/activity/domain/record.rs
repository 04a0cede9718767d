//! Append-only record of one committed transition.

use super::ActivityId;
use crate::access::domain::{SpaceId, UserId};
use crate::task::domain::TaskId;
use crate::workflow::domain::{
    StatusId, TransitionId, TransitionKey, WorkflowId, WorkflowVersion,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object describing a committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionActivity {
    /// The task that moved.
    pub task_id: TaskId,
    /// The task's space.
    pub space_id: SpaceId,
    /// The workflow the transition belongs to.
    pub workflow_id: WorkflowId,
    /// The version the transition belongs to.
    pub workflow_version: WorkflowVersion,
    /// The transition row applied.
    pub transition_id: TransitionId,
    /// The transition's stable key.
    pub transition_key: TransitionKey,
    /// Status the task left.
    pub from_status_id: StatusId,
    /// Status the task entered.
    pub to_status_id: StatusId,
    /// The requester who performed the transition.
    pub actor_id: UserId,
}

/// One history entry per committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    id: ActivityId,
    task_id: TaskId,
    space_id: SpaceId,
    workflow_id: WorkflowId,
    workflow_version: WorkflowVersion,
    transition_id: TransitionId,
    transition_key: TransitionKey,
    from_status_id: StatusId,
    to_status_id: StatusId,
    actor_id: UserId,
    occurred_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Records a committed transition at the clock's current time.
    #[must_use]
    pub fn transition(activity: TransitionActivity, clock: &impl Clock) -> Self {
        Self {
            id: ActivityId::new(),
            task_id: activity.task_id,
            space_id: activity.space_id,
            workflow_id: activity.workflow_id,
            workflow_version: activity.workflow_version,
            transition_id: activity.transition_id,
            transition_key: activity.transition_key,
            from_status_id: activity.from_status_id,
            to_status_id: activity.to_status_id,
            actor_id: activity.actor_id,
            occurred_at: clock.utc(),
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the task that moved.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the task's space.
    #[must_use]
    pub const fn space_id(&self) -> SpaceId {
        self.space_id
    }

    /// Returns the workflow.
    #[must_use]
    pub const fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    /// Returns the workflow version.
    #[must_use]
    pub const fn workflow_version(&self) -> WorkflowVersion {
        self.workflow_version
    }

    /// Returns the applied transition.
    #[must_use]
    pub const fn transition_id(&self) -> TransitionId {
        self.transition_id
    }

    /// Returns the applied transition's key.
    #[must_use]
    pub const fn transition_key(&self) -> &TransitionKey {
        &self.transition_key
    }

    /// Returns the status the task left.
    #[must_use]
    pub const fn from_status_id(&self) -> StatusId {
        self.from_status_id
    }

    /// Returns the status the task entered.
    #[must_use]
    pub const fn to_status_id(&self) -> StatusId {
        self.to_status_id
    }

    /// Returns the requester.
    #[must_use]
    pub const fn actor_id(&self) -> UserId {
        self.actor_id
    }

    /// Returns when the transition was committed.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
