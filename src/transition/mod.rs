//! The workflow transition engine.
//!
//! One call to [`services::TransitionExecutor::perform_transition`] is one
//! attempt: it loads a fresh context, runs the guards in a fixed order,
//! commits the status change with a single conditional write, runs the
//! transition's post-functions, and appends an activity record. Only the
//! conditional write is authoritative; post-functions and history are
//! best-effort side effects that never undo a committed move.
//!
//! - Domain types in [`domain`]
//! - Pure guard evaluation in [`guards`]
//! - Post-function interpretation in [`post_functions`]
//! - Orchestration in [`services`]

pub mod domain;
pub mod guards;
pub mod post_functions;
pub mod services;

#[cfg(test)]
mod tests;
