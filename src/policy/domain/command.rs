//! Blacklist, whitelist, and directory confinement for shell commands.

use super::{PolicyDomainError, PolicyViolation, ViolationKind};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

/// Patterns that refuse a command wherever they appear, matched
/// case-insensitively.
pub const BLOCKED_PATTERNS: [&str; 14] = [
    r"rm\s+-rf",
    r"sudo",
    r"su\s+",
    r"\|\s*bash",
    r"\|\s*sh",
    r"eval\s*\(",
    r"exec\s*\(",
    r">\s*/dev/",
    r"curl.*\|",
    r"wget.*\|",
    r"dd\s+if=",
    r"mkfs\.",
    r"format\s+",
    r":\(\)\{.*\}",
];

/// Programs a command may start with.
pub const ALLOWED_PROGRAMS: [&str; 36] = [
    "git", "npm", "yarn", "pnpm", "node", "python", "python3", "pip", "pip3", "pytest", "jest",
    "vitest", "cargo", "rustc", "go", "make", "cmake", "gcc", "g++", "clang", "javac", "java",
    "mvn", "gradle", "dotnet", "ruby", "gem", "bundle", "php", "composer", "ls", "cat", "echo",
    "pwd", "which", "type",
];

/// Validates shell commands and working directories.
///
/// Blocked patterns are checked before the program name, so a whitelisted
/// program piping into `bash` is still refused.
///
/// # Examples
///
///     use multiagent::policy::domain::{CommandPolicy, ViolationKind};
///
///     let policy = CommandPolicy::standard().expect("built-in patterns compile");
///     assert!(policy.validate("git status").is_ok());
///     let refused = policy.validate("nc -l 1234").expect_err("nc is not allowed");
///     assert_eq!(refused.kind, ViolationKind::NotAllowed("nc".to_owned()));
#[derive(Debug, Clone)]
pub struct CommandPolicy {
    blocked: Vec<(String, Regex)>,
    allowed: BTreeSet<String>,
    root: Option<Utf8PathBuf>,
}

fn compile(pattern: &str) -> Result<Regex, PolicyDomainError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| PolicyDomainError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: err.to_string(),
        })
}

impl CommandPolicy {
    /// Creates the built-in policy with no directory confinement.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyDomainError::InvalidPattern`] if a built-in pattern
    /// fails to compile.
    pub fn standard() -> Result<Self, PolicyDomainError> {
        let blocked = BLOCKED_PATTERNS
            .iter()
            .map(|pattern| Ok(((*pattern).to_owned(), compile(pattern)?)))
            .collect::<Result<Vec<_>, PolicyDomainError>>()?;
        Ok(Self {
            blocked,
            allowed: ALLOWED_PROGRAMS
                .iter()
                .map(|program| (*program).to_owned())
                .collect(),
            root: None,
        })
    }

    /// Adds a blocked pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyDomainError::InvalidPattern`] when `pattern` is not
    /// a valid regular expression.
    pub fn with_blocked_pattern(mut self, pattern: &str) -> Result<Self, PolicyDomainError> {
        self.blocked.push((pattern.to_owned(), compile(pattern)?));
        Ok(self)
    }

    /// Permits commands starting with `program`.
    #[must_use]
    pub fn with_allowed_program(mut self, program: impl Into<String>) -> Self {
        self.allowed.insert(program.into());
        self
    }

    /// Confines working directories to `root`.
    #[must_use]
    pub fn confined_to(mut self, root: impl AsRef<Utf8Path>) -> Self {
        self.root = Some(normalize(root.as_ref()));
        self
    }

    /// Returns the directory commands are confined to, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Utf8Path> {
        self.root.as_deref()
    }

    /// Checks `command` against the blocked patterns and the allow list.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyViolation`] when the command is empty, matches a
    /// blocked pattern, or starts with a program not on the allow list.
    pub fn validate(&self, command: &str) -> Result<(), PolicyViolation> {
        if let Some((pattern, _)) = self.blocked.iter().find(|(_, re)| re.is_match(command)) {
            return Err(PolicyViolation::new(
                command,
                ViolationKind::DangerousPattern(pattern.clone()),
            ));
        }
        let Some(program) = command.split_whitespace().next() else {
            return Err(PolicyViolation::new(command, ViolationKind::EmptyCommand));
        };
        if !self.allowed.contains(program) {
            return Err(PolicyViolation::new(
                command,
                ViolationKind::NotAllowed(program.to_owned()),
            ));
        }
        Ok(())
    }

    /// Resolves `cwd` and checks it lies inside the confinement root.
    ///
    /// Relative directories are taken relative to the root. Paths are
    /// normalized lexically and compared by component, so a sibling such
    /// as `/tmp/safe2` is not inside `/tmp/safe`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyViolation`] with [`ViolationKind::OutsideRoot`] when
    /// the resolved directory escapes the root.
    pub fn validate_cwd(
        &self,
        command: &str,
        cwd: &Utf8Path,
    ) -> Result<Utf8PathBuf, PolicyViolation> {
        let Some(root) = self.root.as_deref() else {
            return Ok(normalize(cwd));
        };
        let resolved = normalize(&root.join(cwd));
        if resolved.starts_with(root) {
            return Ok(resolved);
        }
        Err(PolicyViolation::new(
            command,
            ViolationKind::OutsideRoot {
                cwd: resolved,
                root: root.to_path_buf(),
            },
        ))
    }
}

fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_str()),
        }
    }
    normalized
}
