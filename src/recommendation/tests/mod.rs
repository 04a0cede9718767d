//! Unit tests for the recommendation module.
