//! Best-effort execution of post-functions after a committed move.

use super::template::render_subject;
use crate::access::domain::UserId;
use crate::activity::{domain::NotificationIntent, ports::Notifier};
use crate::task::{
    domain::{MutableTaskField, Task, TaskFieldUpdate},
    ports::TaskStore,
};
use crate::transition::domain::{PostFunctionReport, PostFunctionStatus, SkipReason};
use crate::workflow::domain::{
    NotifyRecipient, PostFunction, SetFieldTarget, Transition, WorkflowStatus,
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

/// The committed move post-functions run against.
#[derive(Debug, Clone, Copy)]
pub struct PostFunctionInput<'a> {
    /// The applied transition.
    pub transition: &'a Transition,
    /// The status the task left.
    pub from_status: &'a WorkflowStatus,
    /// The status the task entered.
    pub to_status: &'a WorkflowStatus,
    /// The requester.
    pub actor_id: UserId,
}

/// Runs post-functions in declaration order.
///
/// Every action sees the task state left by the previous one. No failure
/// escapes the runner: each is logged and recorded in the report.
pub struct PostFunctionRunner<T, N, C>
where
    T: TaskStore + ?Sized,
    N: Notifier + ?Sized,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<T, N, C> PostFunctionRunner<T, N, C>
where
    T: TaskStore + ?Sized,
    N: Notifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a runner.
    #[must_use]
    pub const fn new(tasks: Arc<T>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            notifier,
            clock,
        }
    }

    /// Runs every post-function of `input.transition` against `task`.
    ///
    /// Returns the task as left by the last successful action, together with
    /// one outcome per action.
    pub async fn run(&self, task: Task, input: &PostFunctionInput<'_>) -> (Task, PostFunctionReport) {
        let mut current = task;
        let mut report = PostFunctionReport::new();

        for (index, action) in input.transition.post_functions().iter().enumerate() {
            let status = match action {
                PostFunction::SetField {
                    field: SetFieldTarget::Known(field),
                    value,
                } => self.set_field(&mut current, *field, value).await,
                PostFunction::SetField {
                    field: SetFieldTarget::Unknown(name),
                    ..
                } => {
                    tracing::debug!(
                        transition = %input.transition.key(),
                        field = %name,
                        "skipping SET_FIELD on unknown attribute"
                    );
                    PostFunctionStatus::Skipped(SkipReason::UnknownField(name.clone()))
                }
                PostFunction::Assign { user_id } => {
                    self.update(&mut current, TaskFieldUpdate::Assignee(*user_id))
                        .await
                }
                PostFunction::Notify {
                    recipients,
                    template,
                } => {
                    self.notify(&current, input, recipients, template.as_deref())
                        .await
                }
                PostFunction::Unsupported { action_type } => {
                    tracing::warn!(
                        transition = %input.transition.key(),
                        action_type = %action_type,
                        "ignoring unsupported post-function type"
                    );
                    PostFunctionStatus::Skipped(SkipReason::UnsupportedAction(action_type.clone()))
                }
            };

            if let PostFunctionStatus::Failed(reason) = &status {
                tracing::warn!(
                    task_id = %current.id(),
                    transition = %input.transition.key(),
                    index,
                    action_type = action.action_type(),
                    reason = %reason,
                    "post-function failed; transition stays committed"
                );
            }
            report.record(index, action.action_type(), status);
        }

        (current, report)
    }

    async fn set_field(
        &self,
        current: &mut Task,
        field: MutableTaskField,
        value: &Value,
    ) -> PostFunctionStatus {
        match TaskFieldUpdate::from_configured(field, value) {
            Ok(update) => self.update(current, update).await,
            Err(err) => PostFunctionStatus::Failed(err.to_string()),
        }
    }

    async fn update(&self, current: &mut Task, update: TaskFieldUpdate) -> PostFunctionStatus {
        match self
            .tasks
            .apply_updates(current.id(), &[update], self.clock.utc())
            .await
        {
            Ok(updated) => {
                *current = updated;
                PostFunctionStatus::Applied
            }
            Err(err) => PostFunctionStatus::Failed(err.to_string()),
        }
    }

    async fn notify(
        &self,
        current: &Task,
        input: &PostFunctionInput<'_>,
        recipients: &[NotifyRecipient],
        template: Option<&str>,
    ) -> PostFunctionStatus {
        let resolved = resolve_recipients(recipients, current, input.actor_id);
        if resolved.is_empty() {
            return PostFunctionStatus::Skipped(SkipReason::NoRecipients);
        }
        let subject = match template.map(|text| render_subject(text, current, input)) {
            None => None,
            Some(Ok(rendered)) => Some(rendered),
            Some(Err(reason)) => return PostFunctionStatus::Failed(reason),
        };
        let intent = NotificationIntent {
            task_id: current.id(),
            transition_key: input.transition.key().clone(),
            recipients: resolved,
            subject,
            actor_id: input.actor_id,
        };
        match self.notifier.notify(&intent).await {
            Ok(()) => PostFunctionStatus::Applied,
            Err(err) => PostFunctionStatus::Failed(err.to_string()),
        }
    }
}

fn resolve_recipients(recipients: &[NotifyRecipient], task: &Task, actor_id: UserId) -> Vec<UserId> {
    let mut resolved: Vec<UserId> = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        let user_id = match recipient {
            NotifyRecipient::Assignee => task.assignee_id(),
            NotifyRecipient::Requester => Some(actor_id),
            NotifyRecipient::User(user_id) => Some(*user_id),
        };
        if let Some(id) = user_id
            && !resolved.contains(&id)
        {
            resolved.push(id);
        }
    }
    resolved
}
