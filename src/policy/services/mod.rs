//! Policy-checked command execution.

mod shell;

pub use shell::{CommandOutput, DEFAULT_SHELL_TIMEOUT, ShellError, ShellRunner};
