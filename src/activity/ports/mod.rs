//! Port contracts for activity history and notification hand-off.

pub mod log;
pub mod notifier;

pub use log::{ActivityLog, ActivityLogError, ActivityLogResult};
pub use notifier::{Notifier, NotifyError, NotifyResult};

#[cfg(test)]
pub use log::MockActivityLog;
#[cfg(test)]
pub use notifier::MockNotifier;
