//! Workflow transition edges.

use super::{
    PostFunction, StatusId, TransitionConditions, TransitionId, TransitionKey, Validator,
    WorkflowDomainError,
};
use crate::token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility hint for clients rendering transition controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiTrigger {
    /// Shown as a regular action.
    #[default]
    Normal,
    /// Not shown to users.
    Hidden,
    /// Shown but not actionable.
    Disabled,
}

impl UiTrigger {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hidden => "hidden",
            Self::Disabled => "disabled",
        }
    }

    /// Returns `true` for the normal, visible trigger.
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl TryFrom<&str> for UiTrigger {
    type Error = WorkflowDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match token::fold(value).as_str() {
            "" | "NORMAL" => Ok(Self::Normal),
            "HIDDEN" => Ok(Self::Hidden),
            "DISABLED" => Ok(Self::Disabled),
            _ => Err(WorkflowDomainError::UnknownUiTrigger(value.to_owned())),
        }
    }
}

/// A named, guarded edge between two statuses of one workflow version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    id: TransitionId,
    key: TransitionKey,
    name: String,
    from_status_id: StatusId,
    to_status_id: StatusId,
    ui_trigger: UiTrigger,
    conditions: TransitionConditions,
    validators: Vec<Validator>,
    post_functions: Vec<PostFunction>,
    disabled: bool,
}

impl Transition {
    /// Creates an unguarded transition with a freshly assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when `name` is blank.
    pub fn new(
        key: TransitionKey,
        name: impl Into<String>,
        from_status_id: StatusId,
        to_status_id: StatusId,
    ) -> Result<Self, WorkflowDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(WorkflowDomainError::EmptyName {
                entity: "transition",
            });
        }
        Ok(Self {
            id: TransitionId::new(),
            key,
            name: trimmed.to_owned(),
            from_status_id,
            to_status_id,
            ui_trigger: UiTrigger::Normal,
            conditions: TransitionConditions::open(),
            validators: Vec::new(),
            post_functions: Vec::new(),
            disabled: false,
        })
    }

    /// Sets the UI trigger hint.
    #[must_use]
    pub const fn with_ui_trigger(mut self, ui_trigger: UiTrigger) -> Self {
        self.ui_trigger = ui_trigger;
        self
    }

    /// Sets the role and field conditions.
    #[must_use]
    pub fn with_conditions(mut self, conditions: TransitionConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Sets the validators, in evaluation order.
    #[must_use]
    pub fn with_validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.validators = validators.into_iter().collect();
        self
    }

    /// Sets the post-functions, in execution order.
    #[must_use]
    pub fn with_post_functions(
        mut self,
        post_functions: impl IntoIterator<Item = PostFunction>,
    ) -> Self {
        self.post_functions = post_functions.into_iter().collect();
        self
    }

    /// Marks the transition as disabled.
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the transition identifier.
    #[must_use]
    pub const fn id(&self) -> TransitionId {
        self.id
    }

    /// Returns the version-independent key.
    #[must_use]
    pub const fn key(&self) -> &TransitionKey {
        &self.key
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source status.
    #[must_use]
    pub const fn from_status_id(&self) -> StatusId {
        self.from_status_id
    }

    /// Returns the target status.
    #[must_use]
    pub const fn to_status_id(&self) -> StatusId {
        self.to_status_id
    }

    /// Returns the UI trigger hint.
    #[must_use]
    pub const fn ui_trigger(&self) -> UiTrigger {
        self.ui_trigger
    }

    /// Returns the role and field conditions.
    #[must_use]
    pub const fn conditions(&self) -> &TransitionConditions {
        &self.conditions
    }

    /// Returns the validators in evaluation order.
    #[must_use]
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Returns the post-functions in execution order.
    #[must_use]
    pub fn post_functions(&self) -> &[PostFunction] {
        &self.post_functions
    }

    /// Returns `true` when the transition is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns `true` when the transition starts at `status_id`.
    #[must_use]
    pub fn applies_from(&self, status_id: StatusId) -> bool {
        self.from_status_id == status_id
    }

    /// Returns `true` when `selector` identifies this transition.
    #[must_use]
    pub fn matches(&self, selector: &TransitionSelector) -> bool {
        match selector {
            TransitionSelector::Id(id) => self.id == *id,
            TransitionSelector::Key(key) => self.key == *key,
        }
    }
}

/// How a caller names the transition it wants to perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionSelector {
    /// A version-specific transition identifier.
    Id(TransitionId),
    /// A version-independent transition key.
    Key(TransitionKey),
}

impl TransitionSelector {
    /// Builds a selector from the optional request fields, preferring the
    /// identifier when both are present.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::MissingTransitionSelector`] when both
    /// are absent.
    pub fn from_parts(
        id: Option<TransitionId>,
        key: Option<TransitionKey>,
    ) -> Result<Self, WorkflowDomainError> {
        match (id, key) {
            (Some(transition_id), _) => Ok(Self::Id(transition_id)),
            (None, Some(transition_key)) => Ok(Self::Key(transition_key)),
            (None, None) => Err(WorkflowDomainError::MissingTransitionSelector),
        }
    }
}

impl fmt::Display for TransitionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Key(key) => write!(f, "key '{key}'"),
        }
    }
}
