//! Published workflow versions.

use super::{
    LegacyStatusId, PostFunction, RoleRequirement, StatusCategory, StatusId, StatusKey,
    Transition, TransitionConditions, TransitionDraft, TransitionId, TransitionKey,
    TransitionSelector, UiTrigger, Validator, WorkflowDigest, WorkflowDomainError, WorkflowDraft,
    WorkflowId, WorkflowStatus, WorkflowVersion,
};
use crate::access::domain::SpaceId;
use crate::task::domain::{TaskField, WorkflowBinding};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Identity assigned to a draft when it is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishTarget {
    /// Workflow the version belongs to.
    pub workflow_id: WorkflowId,
    /// Owning space.
    pub space_id: SpaceId,
    /// Version number to assign.
    pub version: WorkflowVersion,
}

/// One immutable, published version of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    id: WorkflowId,
    space_id: SpaceId,
    name: String,
    version: WorkflowVersion,
    statuses: Vec<WorkflowStatus>,
    transitions: Vec<Transition>,
    digest: WorkflowDigest,
    published_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted workflow version.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedWorkflowData {
    /// Workflow identifier.
    pub id: WorkflowId,
    /// Owning space.
    pub space_id: SpaceId,
    /// Display name.
    pub name: String,
    /// Version number.
    pub version: WorkflowVersion,
    /// Status nodes.
    pub statuses: Vec<WorkflowStatus>,
    /// Transition edges.
    pub transitions: Vec<Transition>,
    /// Draft digest.
    pub digest: WorkflowDigest,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    /// Decodes and validates `draft` into a new published version.
    ///
    /// Status and transition identifiers are freshly assigned, so two
    /// versions never share row identifiers; keys carry over.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError`] when the draft has blank names, invalid
    /// or duplicate keys, dangling status references, or undecodable
    /// conditions, validators, or post-functions.
    pub fn publish(
        draft: &WorkflowDraft,
        target: PublishTarget,
        clock: &impl Clock,
    ) -> Result<Self, WorkflowDomainError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(WorkflowDomainError::EmptyName { entity: "workflow" });
        }
        if draft.statuses.is_empty() {
            return Err(WorkflowDomainError::NoStatuses);
        }

        let mut statuses = Vec::with_capacity(draft.statuses.len());
        let mut status_ids: HashMap<StatusKey, StatusId> = HashMap::new();
        for status_draft in &draft.statuses {
            let key = StatusKey::new(status_draft.key.as_str())?;
            if status_ids.contains_key(&key) {
                return Err(WorkflowDomainError::DuplicateStatusKey(key));
            }
            let category = StatusCategory::try_from(status_draft.category.as_str())?;
            let mut status = WorkflowStatus::new(key.clone(), status_draft.name.as_str(), category)?
                .with_final(status_draft.is_final);
            if let Some(legacy) = &status_draft.legacy_status {
                status = status.with_legacy_status(LegacyStatusId::new(legacy.trim()));
            }
            status_ids.insert(key, status.id());
            statuses.push(status);
        }

        let mut transitions = Vec::with_capacity(draft.transitions.len());
        let mut transition_keys: HashSet<TransitionKey> = HashSet::new();
        for transition_draft in &draft.transitions {
            let transition = decode_transition(transition_draft, &status_ids)?;
            if !transition_keys.insert(transition.key().clone()) {
                return Err(WorkflowDomainError::DuplicateTransitionKey(
                    transition.key().clone(),
                ));
            }
            transitions.push(transition);
        }

        Ok(Self {
            id: target.workflow_id,
            space_id: target.space_id,
            name: name.to_owned(),
            version: target.version,
            statuses,
            transitions,
            digest: WorkflowDigest::of_draft(draft)?,
            published_at: clock.utc(),
        })
    }

    /// Reconstructs a workflow version from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkflowData) -> Self {
        Self {
            id: data.id,
            space_id: data.space_id,
            name: data.name,
            version: data.version,
            statuses: data.statuses,
            transitions: data.transitions,
            digest: data.digest,
            published_at: data.published_at,
        }
    }

    /// Returns the workflow identifier.
    #[must_use]
    pub const fn id(&self) -> WorkflowId {
        self.id
    }

    /// Returns the owning space.
    #[must_use]
    pub const fn space_id(&self) -> SpaceId {
        self.space_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version number.
    #[must_use]
    pub const fn version(&self) -> WorkflowVersion {
        self.version
    }

    /// Returns all statuses in declaration order.
    #[must_use]
    pub fn statuses(&self) -> &[WorkflowStatus] {
        &self.statuses
    }

    /// Returns all transitions in declaration order.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the draft digest.
    #[must_use]
    pub const fn digest(&self) -> &WorkflowDigest {
        &self.digest
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub const fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Looks up a status of this version by identifier.
    #[must_use]
    pub fn status(&self, id: StatusId) -> Option<&WorkflowStatus> {
        self.statuses.iter().find(|status| status.id() == id)
    }

    /// Looks up a status of this version by key.
    #[must_use]
    pub fn status_by_key(&self, key: &str) -> Option<&WorkflowStatus> {
        self.statuses
            .iter()
            .find(|status| status.key().as_str() == key)
    }

    /// Returns the first declared status, where new tasks start unless told
    /// otherwise.
    #[must_use]
    pub fn initial_status(&self) -> Option<&WorkflowStatus> {
        self.statuses.first()
    }

    /// Returns a binding to this version at its initial status.
    #[must_use]
    pub fn initial_binding(&self) -> Option<WorkflowBinding> {
        self.initial_status().map(|status| WorkflowBinding {
            workflow_id: self.id,
            version: self.version,
            status_id: status.id(),
        })
    }

    /// Looks up a transition of this version by identifier.
    #[must_use]
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|transition| transition.id() == id)
    }

    /// Looks up a transition of this version by key.
    #[must_use]
    pub fn transition_by_key(&self, key: &TransitionKey) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|transition| transition.key() == key)
    }

    /// Resolves a selector against this version only.
    #[must_use]
    pub fn resolve(&self, selector: &TransitionSelector) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|transition| transition.matches(selector))
    }

    /// Returns transitions leaving `status_id`, in declaration order.
    pub fn outgoing(&self, status_id: StatusId) -> impl Iterator<Item = &Transition> {
        self.transitions
            .iter()
            .filter(move |transition| transition.applies_from(status_id))
    }
}

fn decode_transition(
    draft: &TransitionDraft,
    status_ids: &HashMap<StatusKey, StatusId>,
) -> Result<Transition, WorkflowDomainError> {
    let key = TransitionKey::new(draft.key.as_str())?;
    let resolve_status = |raw: &str| {
        StatusKey::new(raw)
            .ok()
            .and_then(|status_key| status_ids.get(&status_key).copied())
            .ok_or_else(|| WorkflowDomainError::UnknownStatusKey {
                transition: key.clone(),
                status: raw.to_owned(),
            })
    };
    let from_status_id = resolve_status(&draft.from)?;
    let to_status_id = resolve_status(&draft.to)?;

    let ui_trigger = draft
        .ui_trigger
        .as_deref()
        .map_or(Ok(UiTrigger::Normal), UiTrigger::try_from)?;

    let roles = draft
        .conditions
        .roles
        .iter()
        .map(|raw| RoleRequirement::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let required_fields = draft
        .conditions
        .required_fields
        .iter()
        .map(|raw| {
            TaskField::parse(raw).ok_or_else(|| WorkflowDomainError::UnknownTaskField(raw.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let template_fields = draft
        .conditions
        .template_fields
        .iter()
        .map(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(WorkflowDomainError::InvalidKey(raw.clone()))
            } else {
                Ok(trimmed.to_owned())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    let validators = draft
        .validators
        .iter()
        .map(|raw| Validator::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let post_functions = draft
        .post_functions
        .iter()
        .enumerate()
        .map(|(index, raw)| PostFunction::decode(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let conditions = TransitionConditions::open()
        .with_roles(roles)
        .with_required_fields(required_fields)
        .with_template_fields(template_fields);

    Ok(
        Transition::new(key, draft.name.as_str(), from_status_id, to_status_id)?
            .with_ui_trigger(ui_trigger)
            .with_conditions(conditions)
            .with_validators(validators)
            .with_post_functions(post_functions)
            .with_disabled(draft.disabled),
    )
}
