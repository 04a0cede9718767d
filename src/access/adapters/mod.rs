//! Adapter implementations for access lookups.

pub mod memory;
