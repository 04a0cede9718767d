//! End-to-end orchestration of one transition attempt.

use crate::access::{
    domain::UserId,
    ports::{IdentityDirectory, SpaceRoleDirectory},
};
use crate::activity::{
    domain::{ActivityRecord, TransitionActivity},
    ports::{ActivityLog, Notifier},
};
use crate::task::{
    domain::TaskId,
    ports::{StatusChange, TaskStore},
};
use crate::transition::{
    domain::{
        AttemptPhase, InvalidTransitionReason, MissingEntity, RequesterCapabilities,
        TransitionContext, TransitionError, TransitionReceipt, TransitionResult,
    },
    guards::{self, RoleGrant},
    post_functions::{PostFunctionInput, PostFunctionRunner},
};
use crate::workflow::{
    domain::{
        StatusId, TransitionId, TransitionKey, TransitionSelector, WorkflowDefinition,
        WorkflowStatus,
    },
    ports::WorkflowRepository,
    services::{TaskSnapshot, WorkflowDefinitionService},
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for one transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformTransitionRequest {
    task_id: TaskId,
    selector: TransitionSelector,
    requester_id: UserId,
}

impl PerformTransitionRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(task_id: TaskId, selector: TransitionSelector, requester_id: UserId) -> Self {
        Self {
            task_id,
            selector,
            requester_id,
        }
    }

    /// Creates a request from optional transition id and key, preferring the
    /// id when both are given.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Request`] when neither is given.
    pub fn from_parts(
        task_id: TaskId,
        transition_id: Option<TransitionId>,
        transition_key: Option<TransitionKey>,
        requester_id: UserId,
    ) -> TransitionResult<Self> {
        let selector = TransitionSelector::from_parts(transition_id, transition_key)?;
        Ok(Self::new(task_id, selector, requester_id))
    }

    /// Returns the target task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the transition selector.
    #[must_use]
    pub const fn selector(&self) -> &TransitionSelector {
        &self.selector
    }

    /// Returns the requester.
    #[must_use]
    pub const fn requester_id(&self) -> UserId {
        self.requester_id
    }
}

/// Ports the executor depends on.
pub struct TransitionCollaborators<W, T, R, I, A, N>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    R: SpaceRoleDirectory + ?Sized,
    I: IdentityDirectory + ?Sized,
    A: ActivityLog + ?Sized,
    N: Notifier + ?Sized,
{
    /// Published workflow versions.
    pub workflows: Arc<W>,
    /// Task storage with conditional status writes.
    pub tasks: Arc<T>,
    /// Space role lookups.
    pub roles: Arc<R>,
    /// Privileged identity lookups.
    pub identities: Arc<I>,
    /// Transition history sink.
    pub activity: Arc<A>,
    /// Notification hand-off.
    pub notifier: Arc<N>,
}

#[derive(Debug)]
struct Attempt {
    task_id: TaskId,
    phase: AttemptPhase,
}

impl Attempt {
    const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            phase: AttemptPhase::Pending,
        }
    }

    fn advance(&mut self, target: AttemptPhase) {
        if self.phase.can_advance_to(target) {
            tracing::debug!(
                task_id = %self.task_id,
                from = %self.phase,
                to = %target,
                "transition attempt phase change"
            );
            self.phase = target;
        } else {
            tracing::warn!(
                task_id = %self.task_id,
                from = %self.phase,
                to = %target,
                "ignoring illegal attempt phase change"
            );
        }
    }
}

/// Performs guarded, conditionally written transitions.
pub struct TransitionExecutor<W, T, R, I, A, N, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    R: SpaceRoleDirectory + ?Sized,
    I: IdentityDirectory + ?Sized,
    A: ActivityLog + ?Sized,
    N: Notifier + ?Sized,
    C: Clock + Send + Sync,
{
    definitions: WorkflowDefinitionService<W, T, C>,
    tasks: Arc<T>,
    roles: Arc<R>,
    identities: Arc<I>,
    activity: Arc<A>,
    post_functions: PostFunctionRunner<T, N, C>,
    clock: Arc<C>,
}

impl<W, T, R, I, A, N, C> TransitionExecutor<W, T, R, I, A, N, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    R: SpaceRoleDirectory + ?Sized,
    I: IdentityDirectory + ?Sized,
    A: ActivityLog + ?Sized,
    N: Notifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an executor.
    #[must_use]
    pub fn new(collaborators: TransitionCollaborators<W, T, R, I, A, N>, clock: Arc<C>) -> Self {
        let TransitionCollaborators {
            workflows,
            tasks,
            roles,
            identities,
            activity,
            notifier,
        } = collaborators;
        Self {
            definitions: WorkflowDefinitionService::new(
                workflows,
                Arc::clone(&tasks),
                Arc::clone(&clock),
            ),
            post_functions: PostFunctionRunner::new(
                Arc::clone(&tasks),
                notifier,
                Arc::clone(&clock),
            ),
            tasks,
            roles,
            identities,
            activity,
            clock,
        }
    }

    /// Performs one transition attempt.
    ///
    /// The transition is resolved within the task's bound workflow version.
    /// Guards run before anything is written; a failing guard leaves the task
    /// untouched. The status change is a single conditional write keyed on
    /// the transition's source status, and losing that race is reported as
    /// [`TransitionError::ConcurrentModification`] without retrying.
    /// Post-function and history failures are logged and never undo the
    /// committed move.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotFound`], [`TransitionError::PermissionDenied`],
    /// [`TransitionError::ValidationFailed`], [`TransitionError::ValidatorRejected`],
    /// [`TransitionError::InvalidTransition`], or
    /// [`TransitionError::ConcurrentModification`] when the attempt is
    /// refused, and an infrastructure variant when a collaborator fails.
    pub async fn perform_transition(
        &self,
        request: PerformTransitionRequest,
    ) -> TransitionResult<TransitionReceipt> {
        let mut attempt = Attempt::new(request.task_id);
        match self.run_attempt(&request, &mut attempt).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                if attempt.phase == AttemptPhase::Pending {
                    attempt.advance(AttemptPhase::Rejected);
                }
                tracing::debug!(
                    task_id = %request.task_id,
                    selector = %request.selector,
                    requester = %request.requester_id,
                    error = %err,
                    "transition attempt rejected"
                );
                Err(err)
            }
        }
    }

    async fn run_attempt(
        &self,
        request: &PerformTransitionRequest,
        attempt: &mut Attempt,
    ) -> TransitionResult<TransitionReceipt> {
        let snapshot = self.definitions.load_task_context(request.task_id).await?;
        let transition = snapshot.resolve_transition(&request.selector)?.clone();
        let TaskSnapshot { task, workflow } = snapshot;

        if transition.is_disabled() {
            return Err(TransitionError::InvalidTransition {
                transition: transition.key().clone(),
                reason: InvalidTransitionReason::Disabled,
            });
        }
        if !transition.applies_from(task.workflow_status_id()) {
            return Err(TransitionError::InvalidTransition {
                transition: transition.key().clone(),
                reason: InvalidTransitionReason::StatusMismatch {
                    from_status_id: transition.from_status_id(),
                    current_status_id: task.workflow_status_id(),
                },
            });
        }
        let from_status = endpoint(&workflow, transition.from_status_id())?;
        let to_status = endpoint(&workflow, transition.to_status_id())?;

        let role = self
            .roles
            .space_role(task.space_id(), request.requester_id)
            .await?;
        let is_privileged = if transition.conditions().admits_privileged() {
            self.identities.is_privileged(request.requester_id).await?
        } else {
            false
        };
        let requester =
            RequesterCapabilities::resolve(request.requester_id, &task, role, is_privileged);
        let context = TransitionContext::new(task, transition, requester);

        let grant = guards::evaluate(&context).map_err(|failure| failure.into_error(&context))?;
        if grant == RoleGrant::Privileged
            && !self.identities.is_privileged(request.requester_id).await?
        {
            tracing::warn!(
                task_id = %request.task_id,
                requester = %request.requester_id,
                transition = %context.transition().key(),
                "privilege revoked before status write"
            );
            return Err(TransitionError::PermissionDenied {
                user_id: request.requester_id,
                transition: context.transition().key().clone(),
            });
        }

        let change = StatusChange {
            task_id: request.task_id,
            expected_status_id: context.transition().from_status_id(),
            new_status_id: to_status.id(),
            legacy_status_id: to_status.legacy_status_id().cloned(),
            updated_at: self.clock.utc(),
        };
        let moved = self.tasks.compare_and_set_status(&change).await?;
        attempt.advance(AttemptPhase::Applied);
        tracing::info!(
            task_id = %request.task_id,
            transition = %context.transition().key(),
            from = %from_status.key(),
            to = %to_status.key(),
            requester = %request.requester_id,
            "transition applied"
        );

        let input = PostFunctionInput {
            transition: context.transition(),
            from_status,
            to_status,
            actor_id: request.requester_id,
        };
        let (task_after, report) = self.post_functions.run(moved, &input).await;

        let record = ActivityRecord::transition(
            TransitionActivity {
                task_id: request.task_id,
                space_id: task_after.space_id(),
                workflow_id: workflow.id(),
                workflow_version: workflow.version(),
                transition_id: context.transition().id(),
                transition_key: context.transition().key().clone(),
                from_status_id: from_status.id(),
                to_status_id: to_status.id(),
                actor_id: request.requester_id,
            },
            &*self.clock,
        );
        if let Err(err) = self.activity.append(&record).await {
            tracing::warn!(
                task_id = %request.task_id,
                transition = %context.transition().key(),
                error = %err,
                "failed to append activity record; transition stays committed"
            );
        }
        attempt.advance(AttemptPhase::Committed);

        Ok(TransitionReceipt {
            task: task_after,
            transition_id: context.transition().id(),
            transition_key: context.transition().key().clone(),
            from_status_id: from_status.id(),
            new_status_id: to_status.id(),
            workflow_status: to_status.clone(),
            legacy_status_id: change.legacy_status_id,
            phase: attempt.phase,
            post_functions: report,
        })
    }
}

fn endpoint(workflow: &WorkflowDefinition, status_id: StatusId) -> TransitionResult<&WorkflowStatus> {
    workflow
        .status(status_id)
        .ok_or(TransitionError::NotFound(MissingEntity::Status(status_id)))
}
