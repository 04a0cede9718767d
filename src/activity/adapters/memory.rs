//! In-memory activity log and recording notifier.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::activity::{
    domain::{ActivityRecord, NotificationIntent},
    ports::{ActivityLog, ActivityLogError, ActivityLogResult, Notifier, NotifyError, NotifyResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory activity log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLog {
    records: Arc<RwLock<Vec<ActivityRecord>>>,
}

impl InMemoryActivityLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every record in append order.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::Persistence`] if the lock is poisoned.
    pub fn records(&self) -> ActivityLogResult<Vec<ActivityRecord>> {
        let records = self
            .records
            .read()
            .map_err(|err| ActivityLogError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(records.clone())
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn append(&self, record: &ActivityRecord) -> ActivityLogResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|err| ActivityLogError::persistence(std::io::Error::other(err.to_string())))?;
        records.push(record.clone());
        Ok(())
    }

    async fn recent_for_task(
        &self,
        task_id: TaskId,
        limit: usize,
    ) -> ActivityLogResult<Vec<ActivityRecord>> {
        let records = self
            .records
            .read()
            .map_err(|err| ActivityLogError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(records
            .iter()
            .rev()
            .filter(|record| record.task_id() == task_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Notifier that records intents instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<NotificationIntent>>>,
}

impl RecordingNotifier {
    /// Creates a notifier with no recorded intents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every intent received, in order.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Unavailable`] if the lock is poisoned.
    pub fn sent(&self) -> NotifyResult<Vec<NotificationIntent>> {
        let sent = self
            .sent
            .read()
            .map_err(|err| NotifyError::unavailable(std::io::Error::other(err.to_string())))?;
        Ok(sent.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, intent: &NotificationIntent) -> NotifyResult<()> {
        let mut sent = self
            .sent
            .write()
            .map_err(|err| NotifyError::unavailable(std::io::Error::other(err.to_string())))?;
        sent.push(intent.clone());
        Ok(())
    }
}
