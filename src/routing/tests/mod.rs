//! Unit tests for model routing.

mod domain_tests;
