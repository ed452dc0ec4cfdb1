//! Unit tests for configuration.

mod config_tests;
