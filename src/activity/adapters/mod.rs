//! Adapter implementations for activity history and notifications.

pub mod memory;
