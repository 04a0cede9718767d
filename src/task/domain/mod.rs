//! Domain model for tasks driven by a workflow.
//!
//! Tasks are owned by the surrounding application. This crate reads them,
//! moves their workflow status through [`crate::task::ports::TaskStore`]'s
//! conditional write, and applies post-function field updates.

mod error;
mod field;
mod ids;
mod priority;
mod task;

pub use error::TaskDomainError;
pub use field::{MutableTaskField, TaskField, TaskFieldUpdate};
pub use ids::{SubtaskId, TaskId};
pub use priority::Priority;
pub use task::{PersistedTaskData, Subtask, Task, WorkflowBinding};
