//! Unit tests for the transition engine.
