//! What a requester is allowed to claim during one attempt.

use crate::access::domain::{SpaceRole, UserId};
use crate::task::domain::Task;

/// Capabilities of the requester, resolved once per attempt.
///
/// Guards read these as plain data and never query directories themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterCapabilities {
    user_id: UserId,
    role: Option<SpaceRole>,
    is_assignee: bool,
    is_privileged: bool,
}

impl RequesterCapabilities {
    /// Creates capabilities for a requester with no role, assignment, or
    /// privilege.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            role: None,
            is_assignee: false,
            is_privileged: false,
        }
    }

    /// Resolves capabilities for `user_id` acting on `task`.
    #[must_use]
    pub fn resolve(
        user_id: UserId,
        task: &Task,
        role: Option<SpaceRole>,
        is_privileged: bool,
    ) -> Self {
        Self {
            user_id,
            role,
            is_assignee: task.assignee_id() == Some(user_id),
            is_privileged,
        }
    }

    /// Sets the requester's space role.
    #[must_use]
    pub fn with_role(mut self, role: SpaceRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Marks the requester as the task's assignee.
    #[must_use]
    pub const fn with_assignee(mut self, is_assignee: bool) -> Self {
        self.is_assignee = is_assignee;
        self
    }

    /// Marks the requester as a privileged identity.
    #[must_use]
    pub const fn with_privileged(mut self, is_privileged: bool) -> Self {
        self.is_privileged = is_privileged;
        self
    }

    /// Returns the requester.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the requester's space role, if they are a member.
    #[must_use]
    pub const fn role(&self) -> Option<&SpaceRole> {
        self.role.as_ref()
    }

    /// Returns `true` when the requester is the task's current assignee.
    #[must_use]
    pub const fn is_assignee(&self) -> bool {
        self.is_assignee
    }

    /// Returns `true` when the requester held a privileged identity when
    /// capabilities were resolved.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.is_privileged
    }
}
