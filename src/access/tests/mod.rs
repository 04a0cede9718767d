//! Unit tests for access values and in-memory directories.
