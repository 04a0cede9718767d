//! Result of a committed transition.

use super::AttemptPhase;
use crate::task::domain::Task;
use crate::workflow::domain::{LegacyStatusId, StatusId, TransitionId, TransitionKey, WorkflowStatus};

/// Why a post-function did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `SET_FIELD` named an attribute that is not a known mutable field.
    UnknownField(String),
    /// The action type is not implemented.
    UnsupportedAction(String),
    /// `NOTIFY` resolved to no recipients.
    NoRecipients,
}

/// What happened to one post-function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFunctionStatus {
    /// The action took effect.
    Applied,
    /// The action was ignored.
    Skipped(SkipReason),
    /// The action failed; the message is already logged.
    Failed(String),
}

/// Outcome of one post-function, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFunctionOutcome {
    /// Position in the transition's post-function list.
    pub index: usize,
    /// Canonical action type.
    pub action_type: String,
    /// What happened.
    pub status: PostFunctionStatus,
}

/// Outcomes of every post-function of one transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFunctionReport {
    outcomes: Vec<PostFunctionOutcome>,
}

impl PostFunctionReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Appends one outcome.
    pub fn record(&mut self, index: usize, action_type: impl Into<String>, status: PostFunctionStatus) {
        self.outcomes.push(PostFunctionOutcome {
            index,
            action_type: action_type.into(),
            status,
        });
    }

    /// Returns every outcome in declaration order.
    #[must_use]
    pub fn outcomes(&self) -> &[PostFunctionOutcome] {
        &self.outcomes
    }

    /// Returns the number of actions that took effect.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == PostFunctionStatus::Applied)
            .count()
    }

    /// Returns the outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &PostFunctionOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, PostFunctionStatus::Failed(_)))
    }

    /// Returns `true` when any action failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Result of a committed transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionReceipt {
    /// The task after the move and its post-functions.
    pub task: Task,
    /// The applied transition.
    pub transition_id: TransitionId,
    /// The applied transition's key.
    pub transition_key: TransitionKey,
    /// The status the task left.
    pub from_status_id: StatusId,
    /// The status the task entered.
    pub new_status_id: StatusId,
    /// The status the task entered, as defined in its workflow version.
    pub workflow_status: WorkflowStatus,
    /// The mirrored legacy status written with the move.
    pub legacy_status_id: Option<LegacyStatusId>,
    /// Final phase of the attempt.
    pub phase: AttemptPhase,
    /// What each post-function did.
    pub post_functions: PostFunctionReport,
}
