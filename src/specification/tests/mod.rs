//! Unit tests for specifications.
