//! Identifier types for the task domain.

use crate::ids::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for a task record.
    TaskId
}

uuid_identifier! {
    /// Unique identifier for a subtask within its parent task.
    SubtaskId
}
