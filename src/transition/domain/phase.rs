//! Externally visible phases of one transition attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a transition attempt.
///
/// `Pending` moves to `Applied` once the status write succeeds or to
/// `Rejected` when a guard or the write fails. `Applied` moves to
/// `Committed` after post-functions and history have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptPhase {
    /// Context loaded, guards not yet decided.
    Pending,
    /// Status written; post-functions may still be running.
    Applied,
    /// Terminal: the attempt completed.
    Committed,
    /// Terminal: the attempt changed nothing.
    Rejected,
}

impl AttemptPhase {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Applied => "APPLIED",
            Self::Committed => "COMMITTED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns whether moving to `target` is allowed.
    #[must_use]
    pub const fn can_advance_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Applied | Self::Rejected) | (Self::Applied, Self::Committed)
        )
    }

    /// Returns `true` for `Committed` and `Rejected`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Rejected)
    }
}

impl fmt::Display for AttemptPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
