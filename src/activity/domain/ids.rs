//! Identifier types for activity records.

use crate::ids::uuid_identifier;

uuid_identifier! {
    /// Identifier of one activity record.
    ActivityId
}
