//! Tasks bound to a pinned workflow version.
//!
//! A task records which workflow version it runs under and which status of
//! that version it currently occupies. Status changes go through
//! [`ports::TaskStore::compare_and_set_status`] so that two concurrent moves
//! from the same status cannot both succeed. Field-level updates issued by
//! post-functions never touch the status columns.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
