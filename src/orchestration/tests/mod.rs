//! Unit tests for task orchestration.

mod orchestrator_tests;
