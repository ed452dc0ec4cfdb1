//! Domain model for review verdicts and iteration history.

mod error;
mod history;
mod outcome;
mod prompt;
mod verdict;

pub use error::PromptRenderError;
pub use history::{IterationRecord, RECURRENCE_WINDOW, fingerprint, recurring_issues};
pub use outcome::{QaOutcome, QaStatus};
pub use prompt::fix_request;
pub use verdict::{ReviewVerdict, VerdictSource, parse_review};
