//! Unit tests for the workspace context.

mod domain_tests;
