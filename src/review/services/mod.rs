//! Review loop services.

mod qa_loop;

pub use qa_loop::{DEFAULT_MAX_ITERATIONS, QaLoop, QaLoopError};
