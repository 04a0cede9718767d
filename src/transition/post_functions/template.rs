//! Notification subject rendering.

use super::PostFunctionInput;
use crate::task::domain::Task;
use crate::workflow::domain::WorkflowStatus;
use minijinja::Environment;
use serde_json::{Map, Value, json};

/// Renders a `NOTIFY` template against the post-transition task.
///
/// Templates see `task`, `transition`, `from_status`, `to_status`, and
/// `actor`.
pub(super) fn render_subject(
    template: &str,
    task: &Task,
    input: &PostFunctionInput<'_>,
) -> Result<String, String> {
    let context = build_context(task, input)?;
    let environment = Environment::new();
    environment
        .render_str(template, context)
        .map_err(|error| error.to_string())
}

fn build_context(task: &Task, input: &PostFunctionInput<'_>) -> Result<Map<String, Value>, String> {
    let mut context = Map::new();
    context.insert(
        "task".to_owned(),
        serde_json::to_value(task).map_err(|error| error.to_string())?,
    );
    context.insert(
        "transition".to_owned(),
        json!({
            "id": input.transition.id().to_string(),
            "key": input.transition.key().as_str(),
            "name": input.transition.name(),
        }),
    );
    context.insert("from_status".to_owned(), status_value(input.from_status));
    context.insert("to_status".to_owned(), status_value(input.to_status));
    context.insert(
        "actor".to_owned(),
        Value::String(input.actor_id.to_string()),
    );
    Ok(context)
}

fn status_value(status: &WorkflowStatus) -> Value {
    json!({
        "id": status.id().to_string(),
        "key": status.key().as_str(),
        "name": status.name(),
        "category": status.category().as_str(),
    })
}
