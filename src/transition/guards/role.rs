//! Role gating.

use super::GuardFailure;
use crate::access::domain::SpaceRole;
use crate::transition::domain::RequesterCapabilities;
use crate::workflow::domain::{RoleRequirement, TransitionConditions};

/// How a requester satisfied a transition's role list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleGrant {
    /// The list is empty or contains the wildcard.
    Open,
    /// The requester's space role is listed.
    SpaceRole(SpaceRole),
    /// The list admits the assignee and the requester is the assignee.
    Assignee,
    /// The list admits privileged identities and the requester holds one.
    ///
    /// This grant is re-verified immediately before the status write.
    Privileged,
}

/// Checks the requester against the transition's role list.
///
/// A space role match wins over the assignee marker, which wins over the
/// privileged marker. Privilege only satisfies a list that names the
/// privileged marker.
///
/// # Errors
///
/// Returns [`GuardFailure::PermissionDenied`] when nothing matches.
pub fn check_role(
    conditions: &TransitionConditions,
    requester: &RequesterCapabilities,
) -> Result<RoleGrant, GuardFailure> {
    if conditions.is_open_to_all() {
        return Ok(RoleGrant::Open);
    }
    let roles = conditions.roles();

    let role_match = requester.role().filter(|own| {
        roles
            .iter()
            .any(|requirement| matches!(requirement, RoleRequirement::Role(listed) if listed == *own))
    });
    if let Some(role) = role_match {
        return Ok(RoleGrant::SpaceRole(role.clone()));
    }
    if requester.is_assignee() && roles.contains(&RoleRequirement::Assignee) {
        return Ok(RoleGrant::Assignee);
    }
    if requester.is_privileged() && conditions.admits_privileged() {
        return Ok(RoleGrant::Privileged);
    }
    Err(GuardFailure::PermissionDenied)
}
