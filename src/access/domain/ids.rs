//! Identifier types for spaces and users.

use crate::ids::uuid_identifier;

uuid_identifier! {
    /// Identifier of a tenant space that owns workflows and tasks.
    SpaceId
}

uuid_identifier! {
    /// Verified identity of a user, as produced by the authentication layer.
    UserId
}
