//! Switchyard: versioned task workflows with guarded transitions.
//!
//! A space publishes immutable workflow versions: statuses plus named edges
//! between them, each carrying role and field conditions, validators, and
//! declarative post-functions. Tasks are pinned to one version. Moving a task
//! evaluates every guard first, then writes the new status with a single
//! conditional update, then runs post-functions and records history on a
//! best-effort basis. A separate scorer suggests the most plausible next
//! transition without ever permitting or denying anything.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`workflow`]: Workflow definitions, versions, and publishing
//! - [`task`]: The task aggregate and its conditional status write
//! - [`transition`]: Guard evaluation, transition execution, post-functions
//! - [`recommendation`]: Next-transition suggestions
//! - [`access`]: Space role and privileged identity lookups
//! - [`activity`]: Transition history and notification hand-off
//! - [`config`]: Environment-driven configuration
//! - [`telemetry`]: Tracing subscriber setup

mod ids;
mod token;

pub mod access;
pub mod activity;
pub mod config;
pub mod recommendation;
pub mod task;
pub mod telemetry;
pub mod transition;
pub mod workflow;
