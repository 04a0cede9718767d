//! Notification hand-off port.

use crate::activity::domain::NotificationIntent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Accepts notification intents for delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hands one intent to the delivery system.
    async fn notify(&self, intent: &NotificationIntent) -> NotifyResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The delivery system refused or could not be reached.
    #[error("notifier unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifyError {
    /// Wraps a delivery failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
