//! Policy rules and violations.

mod command;
mod error;

pub use command::{ALLOWED_PROGRAMS, BLOCKED_PATTERNS, CommandPolicy};
pub use error::{PolicyDomainError, PolicyViolation, ViolationKind};
