//! Unit tests for the command policy.

mod shell_runner_tests;
