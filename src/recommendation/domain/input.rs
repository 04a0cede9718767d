//! Plain-data context handed to the scorer.

use crate::activity::domain::ActivityRecord;
use crate::task::domain::{Priority, Task};
use crate::workflow::domain::{
    StatusId, Transition, TransitionId, TransitionKey, UiTrigger, WorkflowDefinition,
    WorkflowStatus,
};
use serde::{Deserialize, Serialize};

/// Resolved target status of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTarget {
    /// Target status.
    pub status_id: StatusId,
    /// Target status display name, matched against keyword families.
    pub name: String,
}

/// One transition the scorer may rank.
///
/// Endpoints are optional so that inline contexts can describe edges whose
/// statuses no longer resolve; such candidates are never suggested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionCandidate {
    /// Transition identifier.
    pub transition_id: TransitionId,
    /// Transition key.
    pub transition_key: TransitionKey,
    /// Source status, when it resolves.
    pub from_status_id: Option<StatusId>,
    /// Target status, when it resolves.
    pub to_status: Option<CandidateTarget>,
    /// Whether the transition is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// UI visibility hint.
    #[serde(default)]
    pub ui_trigger: UiTrigger,
    /// Whether the role list restricts who may perform it.
    #[serde(default)]
    pub role_restricted: bool,
}

impl TransitionCandidate {
    /// Describes `transition` as declared in `workflow`.
    #[must_use]
    pub fn from_workflow(workflow: &WorkflowDefinition, transition: &Transition) -> Self {
        Self {
            transition_id: transition.id(),
            transition_key: transition.key().clone(),
            from_status_id: workflow
                .status(transition.from_status_id())
                .map(WorkflowStatus::id),
            to_status: workflow
                .status(transition.to_status_id())
                .map(|status| CandidateTarget {
                    status_id: status.id(),
                    name: status.name().to_owned(),
                }),
            disabled: transition.is_disabled(),
            ui_trigger: transition.ui_trigger(),
            role_restricted: !transition.conditions().is_open_to_all(),
        }
    }
}

/// One past status move of the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Status the task left.
    pub from_status_id: StatusId,
    /// Status the task entered.
    pub to_status_id: StatusId,
}

impl From<&ActivityRecord> for HistoryEntry {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            from_status_id: record.from_status_id(),
            to_status_id: record.to_status_id(),
        }
    }
}

/// Everything the scorer looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionInput {
    /// The task's current workflow status.
    pub current_status_id: StatusId,
    /// Candidate transitions in definition order.
    pub candidates: Vec<TransitionCandidate>,
    /// Recent moves, most recent first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Task tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Task priority.
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl SuggestionInput {
    /// Builds the input for a stored task: candidates are the transitions
    /// leaving its current status in its bound workflow version.
    #[must_use]
    pub fn for_task(task: &Task, workflow: &WorkflowDefinition, history: Vec<HistoryEntry>) -> Self {
        Self {
            current_status_id: task.workflow_status_id(),
            candidates: workflow
                .outgoing(task.workflow_status_id())
                .map(|transition| TransitionCandidate::from_workflow(workflow, transition))
                .collect(),
            history,
            tags: task.tags().to_vec(),
            priority: task.priority(),
        }
    }
}
