//! Activity and notification records.

mod ids;
mod notification;
mod record;

pub use ids::ActivityId;
pub use notification::NotificationIntent;
pub use record::{ActivityRecord, TransitionActivity};
