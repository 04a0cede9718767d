//! Space membership and identity lookups consumed by the transition engine.
//!
//! Authentication, sessions, and membership management live outside this
//! crate. This module only names the narrow questions the engine asks of
//! them: which role a user holds in a space, and whether a user carries an
//! elevated system identity.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
