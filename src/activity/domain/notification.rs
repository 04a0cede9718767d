//! Notification intents produced by `NOTIFY` post-functions.

use crate::access::domain::UserId;
use crate::task::domain::TaskId;
use crate::workflow::domain::TransitionKey;
use serde::{Deserialize, Serialize};

/// A request to notify users about a committed transition.
///
/// Delivery is the notifier's concern; the intent only names who should hear
/// about what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    /// The task that moved.
    pub task_id: TaskId,
    /// The transition that was applied.
    pub transition_key: TransitionKey,
    /// Distinct recipients in declaration order.
    pub recipients: Vec<UserId>,
    /// Rendered subject line, when the action configured a template.
    pub subject: Option<String>,
    /// The requester who performed the transition.
    pub actor_id: UserId,
}
