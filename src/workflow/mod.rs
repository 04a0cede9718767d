//! Versioned workflow definitions for a space.
//!
//! A workflow is a graph of statuses connected by guarded transitions.
//! Published versions are immutable; editing a workflow publishes a new
//! version, and every task stays bound to the version it was created under.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
