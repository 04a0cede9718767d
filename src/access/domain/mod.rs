//! Identity and membership values shared across bounded contexts.

mod error;
mod ids;
mod role;

pub use error::AccessDomainError;
pub use ids::{SpaceId, UserId};
pub use role::SpaceRole;
