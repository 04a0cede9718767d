//! Audit history and notification hand-off for committed transitions.
//!
//! The audit log and the notification delivery system are external
//! collaborators. This module defines the records the engine hands to them
//! and the append-only ports it hands them through.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
