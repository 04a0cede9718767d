//! Declarative side effects run after a transition commits.

use super::WorkflowDomainError;
use crate::token;
use crate::access::domain::UserId;
use crate::task::domain::MutableTaskField;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Target of a `SET_FIELD` action.
///
/// Targets that name no mutable task attribute are kept as
/// [`SetFieldTarget::Unknown`] so that definitions written for newer
/// attributes still load; the runner skips them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SetFieldTarget {
    /// A known, mutable task attribute.
    Known(MutableTaskField),
    /// An attribute this engine does not recognise.
    Unknown(String),
}

impl SetFieldTarget {
    /// Decodes a field name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        MutableTaskField::parse(raw).map_or_else(|| Self::Unknown(raw.trim().to_owned()), Self::Known)
    }
}

impl From<String> for SetFieldTarget {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SetFieldTarget> for String {
    fn from(target: SetFieldTarget) -> Self {
        match target {
            SetFieldTarget::Known(field) => field.as_str().to_owned(),
            SetFieldTarget::Unknown(name) => name,
        }
    }
}

/// Recipient of a notification intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NotifyRecipient {
    /// The task's assignee after the transition.
    Assignee,
    /// The user who performed the transition.
    Requester,
    /// A specific user.
    User(UserId),
}

impl NotifyRecipient {
    /// Decodes a recipient entry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidRecipient`] when the entry is
    /// neither a marker nor a user identifier.
    pub fn parse(raw: &str) -> Result<Self, WorkflowDomainError> {
        match token::fold(raw).as_str() {
            "ASSIGNEE" => Ok(Self::Assignee),
            "REQUESTER" => Ok(Self::Requester),
            _ => raw
                .parse::<UserId>()
                .map(Self::User)
                .map_err(|_| WorkflowDomainError::InvalidRecipient(raw.to_owned())),
        }
    }
}

impl TryFrom<String> for NotifyRecipient {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NotifyRecipient> for String {
    fn from(recipient: NotifyRecipient) -> Self {
        match recipient {
            NotifyRecipient::Assignee => "ASSIGNEE".to_owned(),
            NotifyRecipient::Requester => "REQUESTER".to_owned(),
            NotifyRecipient::User(user_id) => user_id.to_string(),
        }
    }
}

/// One action of a transition's post-function list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostFunction {
    /// Sets a task attribute to a configured value.
    SetField {
        /// Attribute to set.
        field: SetFieldTarget,
        /// Raw configured value, interpreted against the attribute's type.
        value: Value,
    },
    /// Reassigns the task.
    Assign {
        /// New assignee; `None` unassigns the task.
        user_id: Option<UserId>,
    },
    /// Emits a notification intent.
    Notify {
        /// Recipients in declaration order.
        recipients: Vec<NotifyRecipient>,
        /// Optional `minijinja` template for the notification subject.
        template: Option<String>,
    },
    /// An action type this engine does not implement.
    Unsupported {
        /// The configured type tag.
        action_type: String,
    },
}

impl PostFunction {
    /// Decodes one raw action object.
    ///
    /// Unrecognised action types decode to [`PostFunction::Unsupported`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::MalformedPostFunction`] when the entry
    /// is not an object, lacks a `type`, or carries a malformed payload for a
    /// recognised type.
    pub fn decode(index: usize, raw: &Value) -> Result<Self, WorkflowDomainError> {
        let malformed = |reason: &str| WorkflowDomainError::MalformedPostFunction {
            index,
            reason: reason.to_owned(),
        };
        let object = raw
            .as_object()
            .ok_or_else(|| malformed("expected an object"))?;
        let action_type = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing string field 'type'"))?;

        match token::fold(action_type).as_str() {
            "SETFIELD" => {
                let field = object
                    .get("field")
                    .and_then(Value::as_str)
                    .ok_or_else(|| malformed("SET_FIELD requires a string 'field'"))?;
                Ok(Self::SetField {
                    field: SetFieldTarget::parse(field),
                    value: object.get("value").cloned().unwrap_or(Value::Null),
                })
            }
            "ASSIGN" => {
                let user_id = match object.get("userId").or_else(|| object.get("user_id")) {
                    None | Some(Value::Null) => None,
                    Some(Value::String(raw_id)) => Some(
                        raw_id
                            .parse::<UserId>()
                            .map_err(|_| malformed("ASSIGN 'userId' is not a valid identifier"))?,
                    ),
                    Some(_) => return Err(malformed("ASSIGN 'userId' must be a string or null")),
                };
                Ok(Self::Assign { user_id })
            }
            "NOTIFY" => {
                let recipients = match object.get("recipients") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(entries)) => entries
                        .iter()
                        .map(|entry| {
                            entry
                                .as_str()
                                .ok_or_else(|| malformed("NOTIFY recipients must be strings"))
                                .and_then(NotifyRecipient::parse)
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    Some(_) => return Err(malformed("NOTIFY 'recipients' must be an array")),
                };
                let template = match object.get("template") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(text)) => Some(text.clone()),
                    Some(_) => return Err(malformed("NOTIFY 'template' must be a string")),
                };
                Ok(Self::Notify {
                    recipients,
                    template,
                })
            }
            _ => Ok(Self::Unsupported {
                action_type: action_type.to_owned(),
            }),
        }
    }

    /// Returns the canonical action type name.
    #[must_use]
    pub fn action_type(&self) -> &str {
        match self {
            Self::SetField { .. } => "SET_FIELD",
            Self::Assign { .. } => "ASSIGN",
            Self::Notify { .. } => "NOTIFY",
            Self::Unsupported { action_type } => action_type,
        }
    }
}

impl fmt::Display for PostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_type())
    }
}
