//! Ports consumed by the QA review loop.

mod agents;
mod observer;

pub use agents::{AgentError, AgentResult, Fixer, Reviewer};
pub use observer::{IterationObserver, NoopObserver, ObserverError};
