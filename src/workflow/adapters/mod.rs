//! Adapter implementations for workflow definition storage.

pub mod memory;
pub mod postgres;
