//! Snapshot evaluated by the guards.

use super::RequesterCapabilities;
use crate::task::domain::Task;
use crate::workflow::domain::Transition;

/// Everything one attempt's guards may look at.
///
/// Built fresh for every attempt and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionContext {
    task: Task,
    transition: Transition,
    requester: RequesterCapabilities,
}

impl TransitionContext {
    /// Assembles a context.
    #[must_use]
    pub const fn new(task: Task, transition: Transition, requester: RequesterCapabilities) -> Self {
        Self {
            task,
            transition,
            requester,
        }
    }

    /// Returns the task as loaded for this attempt.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the resolved transition.
    #[must_use]
    pub const fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Returns the requester's capabilities.
    #[must_use]
    pub const fn requester(&self) -> &RequesterCapabilities {
        &self.requester
    }
}
