//! Unit tests for the review context.

mod verdict_tests;
