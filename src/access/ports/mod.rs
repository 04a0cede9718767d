//! Port contracts for membership and identity lookups.

pub mod directory;

pub use directory::{AccessLookupError, AccessLookupResult, IdentityDirectory, SpaceRoleDirectory};

#[cfg(test)]
pub use directory::{MockIdentityDirectory, MockSpaceRoleDirectory};
