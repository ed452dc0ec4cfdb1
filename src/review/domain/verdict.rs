//! Reviewer output parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

const APPROVAL_TOKEN: &str = "APPROVED";

/// Parsing path that produced a [`ReviewVerdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// The reviewer emitted a decodable JSON verdict.
    Structured,
    /// No decodable verdict was found; the approval token decided.
    Heuristic,
}

impl VerdictSource {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reviewer decision for one artifact revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewVerdict {
    approved: bool,
    issues: Vec<String>,
    source: VerdictSource,
    raw: Option<String>,
}

#[derive(Deserialize)]
struct StructuredVerdict {
    approved: bool,
    #[serde(default)]
    issues: Vec<String>,
}

impl ReviewVerdict {
    /// Creates a structured verdict.
    ///
    /// Duplicate issues are collapsed, keeping first-seen order.
    #[must_use]
    pub fn structured(approved: bool, issues: Vec<String>) -> Self {
        Self {
            approved,
            issues: dedup_issues(issues),
            source: VerdictSource::Structured,
            raw: None,
        }
    }

    /// Creates a heuristic verdict from unstructured reviewer text.
    #[must_use]
    pub fn heuristic(raw: impl Into<String>) -> Self {
        let text = raw.into();
        Self {
            approved: text.to_uppercase().contains(APPROVAL_TOKEN),
            issues: Vec::new(),
            source: VerdictSource::Heuristic,
            raw: Some(text),
        }
    }

    /// Returns whether the reviewer explicitly approved.
    #[must_use]
    pub const fn approved(&self) -> bool {
        self.approved
    }

    /// Returns the distinct issues reported.
    #[must_use]
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Returns which parsing path produced the verdict.
    #[must_use]
    pub const fn source(&self) -> VerdictSource {
        self.source
    }

    /// Returns the raw reviewer text for heuristic verdicts.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Returns whether the loop should stop with an approval.
    ///
    /// A rejection without any issue has nothing actionable to fix and is
    /// treated as an approval.
    #[must_use]
    pub fn is_approval(&self) -> bool {
        self.approved || self.issues.is_empty()
    }
}

/// Parses raw reviewer output into a verdict. Never fails.
///
/// The text between the first `{` and the last `}` is decoded as a JSON
/// object carrying a boolean `approved` and an optional string list
/// `issues`. When no such span exists or it does not decode, the verdict is
/// approved iff the text contains `APPROVED` in any letter case, and carries
/// no issues.
///
/// # Examples
///
///     use multiagent::review::domain::{VerdictSource, parse_review};
///
///     let verdict = parse_review(r#"Looks off: {"approved": false, "issues": ["typo"]}"#);
///     assert_eq!(verdict.source(), VerdictSource::Structured);
///     assert_eq!(verdict.issues(), ["typo".to_owned()]);
///
///     let fallback = parse_review("LGTM, approved.");
///     assert_eq!(fallback.source(), VerdictSource::Heuristic);
///     assert!(fallback.approved());
#[must_use]
pub fn parse_review(output: &str) -> ReviewVerdict {
    outermost_braces(output)
        .and_then(|candidate| serde_json::from_str::<StructuredVerdict>(candidate).ok())
        .map_or_else(
            || ReviewVerdict::heuristic(output),
            |decoded| ReviewVerdict::structured(decoded.approved, decoded.issues),
        )
}

fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    text.get(start..=end)
}

fn dedup_issues(issues: Vec<String>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::with_capacity(issues.len());
    for issue in issues {
        if !distinct.contains(&issue) {
            distinct.push(issue);
        }
    }
    distinct
}
