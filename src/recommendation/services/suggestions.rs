//! Suggestion service over stored tasks and their history.

use crate::activity::ports::{ActivityLog, ActivityLogError};
use crate::config::RecommendationConfig;
use crate::recommendation::{
    domain::{HistoryEntry, SuggestionInput, TransitionSuggestion},
    scorer,
};
use crate::task::{domain::TaskId, ports::TaskStore};
use crate::workflow::{
    ports::WorkflowRepository,
    services::{TaskSnapshot, WorkflowDefinitionService, WorkflowServiceError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Result type for suggestion lookups.
pub type SuggestionResult<T> = Result<T, SuggestionError>;

/// Errors returned while assembling a suggestion context.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// The task or its bound workflow version could not be loaded.
    #[error(transparent)]
    Context(#[from] WorkflowServiceError),

    /// History lookup failed.
    #[error(transparent)]
    Activity(#[from] ActivityLogError),
}

/// What to suggest a transition for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionRequest {
    /// A stored task; candidates and history are loaded.
    Task(TaskId),
    /// A caller-assembled context, scored as given.
    Inline(SuggestionInput),
}

/// Suggests next transitions for stored tasks or inline contexts.
pub struct SuggestionService<W, T, A, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    A: ActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    definitions: WorkflowDefinitionService<W, T, C>,
    activity: Arc<A>,
    history_depth: usize,
}

impl<W, T, A, C> Clone for SuggestionService<W, T, A, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    A: ActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            definitions: self.definitions.clone(),
            activity: Arc::clone(&self.activity),
            history_depth: self.history_depth,
        }
    }
}

impl<W, T, A, C> SuggestionService<W, T, A, C>
where
    W: WorkflowRepository + ?Sized,
    T: TaskStore + ?Sized,
    A: ActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a service reading `config.history_depth` recent moves per task.
    #[must_use]
    pub const fn new(
        definitions: WorkflowDefinitionService<W, T, C>,
        activity: Arc<A>,
        config: &RecommendationConfig,
    ) -> Self {
        Self {
            definitions,
            activity,
            history_depth: config.history_depth,
        }
    }

    /// Suggests a transition, or `None` when nothing is worth showing.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError`] when a stored task's context cannot be
    /// loaded. Inline requests never fail.
    pub async fn suggest(
        &self,
        request: SuggestionRequest,
    ) -> SuggestionResult<Option<TransitionSuggestion>> {
        match request {
            SuggestionRequest::Task(task_id) => self.suggest_for_task(task_id).await,
            SuggestionRequest::Inline(input) => Ok(scorer::suggest(&input)),
        }
    }

    /// Suggests a transition for a stored task using its bound workflow
    /// version and recent history.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError::Context`] when the task or its bound
    /// version is missing or cannot be read, and
    /// [`SuggestionError::Activity`] when history cannot be read.
    pub async fn suggest_for_task(
        &self,
        task_id: TaskId,
    ) -> SuggestionResult<Option<TransitionSuggestion>> {
        let TaskSnapshot { task, workflow } = self.definitions.load_task_context(task_id).await?;
        let history = self
            .activity
            .recent_for_task(task_id, self.history_depth)
            .await?
            .iter()
            .map(HistoryEntry::from)
            .collect();

        let suggestion = scorer::suggest(&SuggestionInput::for_task(&task, &workflow, history));
        match &suggestion {
            Some(found) => tracing::debug!(
                task_id = %task_id,
                transition = %found.transition_key,
                confidence = %found.confidence,
                "suggested next transition"
            ),
            None => tracing::debug!(task_id = %task_id, "no transition worth suggesting"),
        }
        Ok(suggestion)
    }
}
