//! Multiagent: a coding pipeline run by a team of model agents.
//!
//! A task specification is planned, implemented, tested, reviewed, and
//! merged by agents with distinct roles. Every phase output passes a review
//! loop that fixes and re-reviews until approval, the iteration cap, or a
//! recurring set of issues. Each task works in its own git worktree and
//! branch, and its state survives restarts.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (filesystem, git, HTTP)
//!
//! # Modules
//!
//! - [`config`]: Project layout and the persisted configuration
//! - [`orchestration`]: Phase state machine driving a task to merge
//! - [`policy`]: Command validation and confined command execution
//! - [`review`]: Verdict parsing and the review-fix loop
//! - [`routing`]: Role-to-model routing with fallback and retries
//! - [`specification`]: Task specification documents
//! - [`task`]: Task identity, lifecycle, and persisted state
//! - [`telemetry`]: Tracing subscriber and log files
//! - [`workspace`]: Per-task worktrees, checkpoints, and merges

pub mod config;
pub mod orchestration;
pub mod policy;
pub mod review;
pub mod routing;
pub mod specification;
pub mod task;
pub mod telemetry;
pub mod workspace;
