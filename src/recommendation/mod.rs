//! Next-transition suggestions for a task.
//!
//! The scorer ranks; it never permits or denies anything. Role-gated
//! transitions are never suggested because no requester is known, and a
//! suggestion whose confidence falls below [`scorer::MIN_CONFIDENCE`] is
//! withheld entirely.
//!
//! - Domain types in [`domain`]
//! - The pure ranking function in [`scorer`]
//! - Task-backed lookups in [`services`]

pub mod domain;
pub mod scorer;
pub mod services;

#[cfg(test)]
mod tests;
