//! In-memory membership and identity directories.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::access::{
    domain::{SpaceId, SpaceRole, UserId},
    ports::{AccessLookupError, AccessLookupResult, IdentityDirectory, SpaceRoleDirectory},
};

/// Thread-safe in-memory space membership table.
#[derive(Debug, Clone, Default)]
pub struct InMemorySpaceRoles {
    roles: Arc<RwLock<HashMap<(SpaceId, UserId), SpaceRole>>>,
}

impl InMemorySpaceRoles {
    /// Creates an empty membership table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `role` to `user_id` in `space_id`, replacing any earlier role.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLookupError::Unavailable`] if the lock is poisoned.
    pub fn grant(
        &self,
        space_id: SpaceId,
        user_id: UserId,
        role: SpaceRole,
    ) -> AccessLookupResult<()> {
        let mut roles = self
            .roles
            .write()
            .map_err(|err| AccessLookupError::unavailable(std::io::Error::other(err.to_string())))?;
        roles.insert((space_id, user_id), role);
        Ok(())
    }

    /// Removes any role `user_id` holds in `space_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLookupError::Unavailable`] if the lock is poisoned.
    pub fn revoke(&self, space_id: SpaceId, user_id: UserId) -> AccessLookupResult<()> {
        let mut roles = self
            .roles
            .write()
            .map_err(|err| AccessLookupError::unavailable(std::io::Error::other(err.to_string())))?;
        roles.remove(&(space_id, user_id));
        Ok(())
    }
}

#[async_trait]
impl SpaceRoleDirectory for InMemorySpaceRoles {
    async fn space_role(
        &self,
        space_id: SpaceId,
        user_id: UserId,
    ) -> AccessLookupResult<Option<SpaceRole>> {
        let roles = self
            .roles
            .read()
            .map_err(|err| AccessLookupError::unavailable(std::io::Error::other(err.to_string())))?;
        Ok(roles.get(&(space_id, user_id)).cloned())
    }
}

/// Thread-safe in-memory set of privileged identities.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    privileged: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryIdentityDirectory {
    /// Creates a directory with no privileged identities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `user_id` as privileged or clears the mark.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLookupError::Unavailable`] if the lock is poisoned.
    pub fn set_privileged(&self, user_id: UserId, privileged: bool) -> AccessLookupResult<()> {
        let mut set = self
            .privileged
            .write()
            .map_err(|err| AccessLookupError::unavailable(std::io::Error::other(err.to_string())))?;
        if privileged {
            set.insert(user_id);
        } else {
            set.remove(&user_id);
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn is_privileged(&self, user_id: UserId) -> AccessLookupResult<bool> {
        let set = self
            .privileged
            .read()
            .map_err(|err| AccessLookupError::unavailable(std::io::Error::other(err.to_string())))?;
        Ok(set.contains(&user_id))
    }
}
