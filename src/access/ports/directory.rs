//! Lookup ports for space roles and privileged identities.

use crate::access::domain::{SpaceId, SpaceRole, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for access lookups.
pub type AccessLookupResult<T> = Result<T, AccessLookupError>;

/// Resolves the role a user holds within a space.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpaceRoleDirectory: Send + Sync {
    /// Returns the user's role in the space, or `None` when the user is not
    /// a member.
    async fn space_role(
        &self,
        space_id: SpaceId,
        user_id: UserId,
    ) -> AccessLookupResult<Option<SpaceRole>>;
}

/// Resolves elevated (system administrator) identities.
///
/// Privilege is a property of the identity, not of any space membership,
/// and may change independently of role assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Returns `true` when the user currently holds a privileged identity.
    async fn is_privileged(&self, user_id: UserId) -> AccessLookupResult<bool>;
}

/// Errors returned by access lookup implementations.
#[derive(Debug, Clone, Error)]
pub enum AccessLookupError {
    /// The upstream directory could not be reached or answered with an error.
    #[error("access directory unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl AccessLookupError {
    /// Wraps an upstream failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
