//! Raw workflow authoring payloads.
//!
//! Drafts mirror what authoring clients submit: statuses are referenced by
//! key, and conditions, validators, and post-functions are plain strings and
//! JSON objects. [`super::WorkflowDefinition::publish`] decodes them into
//! typed values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A workflow as submitted for publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDraft {
    /// Workflow display name.
    pub name: String,
    /// Status nodes.
    #[serde(default)]
    pub statuses: Vec<StatusDraft>,
    /// Transition edges.
    #[serde(default)]
    pub transitions: Vec<TransitionDraft>,
}

impl WorkflowDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statuses: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Appends a status.
    #[must_use]
    pub fn with_status(mut self, status: StatusDraft) -> Self {
        self.statuses.push(status);
        self
    }

    /// Appends a transition.
    #[must_use]
    pub fn with_transition(mut self, transition: TransitionDraft) -> Self {
        self.transitions.push(transition);
        self
    }
}

/// A status as submitted for publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDraft {
    /// Stable status key referenced by transitions.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Category name, such as `TODO`, `IN_PROGRESS`, or `DONE`.
    pub category: String,
    /// Whether the status ends the workflow.
    #[serde(default)]
    pub is_final: bool,
    /// Optional legacy simple status mapping.
    #[serde(default)]
    pub legacy_status: Option<String>,
}

impl StatusDraft {
    /// Creates a non-final status draft.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            category: category.into(),
            is_final: false,
            legacy_status: None,
        }
    }

    /// Marks the status as final.
    #[must_use]
    pub const fn final_status(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Maps the status to a legacy simple status.
    #[must_use]
    pub fn with_legacy_status(mut self, legacy_status: impl Into<String>) -> Self {
        self.legacy_status = Some(legacy_status.into());
        self
    }
}

/// Raw transition conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsDraft {
    /// Role list entries: role names, `ANY`, `ASSIGNEE`, or `SYSTEM_ADMIN`.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Standard task field names that must be present.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Custom-field keys that must carry a value.
    #[serde(default)]
    pub template_fields: Vec<String>,
}

/// A transition as submitted for publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDraft {
    /// Stable transition key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Source status key.
    pub from: String,
    /// Target status key.
    pub to: String,
    /// Optional UI trigger hint.
    #[serde(default)]
    pub ui_trigger: Option<String>,
    /// Role and field conditions.
    #[serde(default)]
    pub conditions: ConditionsDraft,
    /// Validator names.
    #[serde(default)]
    pub validators: Vec<String>,
    /// Post-function objects, each tagged by a `type` field.
    #[serde(default)]
    pub post_functions: Vec<Value>,
    /// Whether the transition is disabled.
    #[serde(default)]
    pub disabled: bool,
}

impl TransitionDraft {
    /// Creates an unguarded transition draft.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            from: from.into(),
            to: to.into(),
            ui_trigger: None,
            conditions: ConditionsDraft::default(),
            validators: Vec::new(),
            post_functions: Vec::new(),
            disabled: false,
        }
    }

    /// Sets the role list.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the required standard task fields.
    #[must_use]
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the required custom-field keys.
    #[must_use]
    pub fn with_template_fields<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.template_fields = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the validator names.
    #[must_use]
    pub fn with_validators<I, S>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validators = validators.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a raw post-function object.
    #[must_use]
    pub fn with_post_function(mut self, post_function: Value) -> Self {
        self.post_functions.push(post_function);
        self
    }

    /// Sets the UI trigger hint.
    #[must_use]
    pub fn with_ui_trigger(mut self, ui_trigger: impl Into<String>) -> Self {
        self.ui_trigger = Some(ui_trigger.into());
        self
    }

    /// Marks the transition as disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}
