//! Port contracts for task storage.
//!
//! Ports define infrastructure-agnostic interfaces used by the engine.

pub mod store;

pub use store::{StatusChange, TaskStore, TaskStoreError, TaskStoreResult};
