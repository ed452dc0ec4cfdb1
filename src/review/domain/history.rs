//! Iteration history and recurring-issue detection.

use super::{ReviewVerdict, VerdictSource};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Number of most recent iterations, the current one included, that an issue
/// must appear in to count as recurring.
pub const RECURRENCE_WINDOW: usize = 3;

/// Audit entry for one review round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// One-based iteration index. The loop numbers each run from 1; a task
    /// history renumbers it to count across every run of the phase.
    pub iteration: u32,
    /// Distinct issues the reviewer reported.
    pub issues: Vec<String>,
    /// Whether the reviewer explicitly approved.
    pub approved: bool,
    /// Length in bytes of the reviewed artifact.
    pub code_length: usize,
    /// Hex-encoded SHA-256 digest of the reviewed artifact.
    pub fingerprint: String,
    /// Parsing path that produced the verdict.
    pub source: VerdictSource,
}

impl IterationRecord {
    /// Builds the record for `verdict` issued against `artifact`.
    #[must_use]
    pub fn from_verdict(iteration: u32, verdict: &ReviewVerdict, artifact: &str) -> Self {
        Self {
            iteration,
            issues: verdict.issues().to_vec(),
            approved: verdict.approved(),
            code_length: artifact.len(),
            fingerprint: fingerprint(artifact),
            source: verdict.source(),
        }
    }
}

/// Returns the hex-encoded SHA-256 digest of `artifact`.
#[must_use]
pub fn fingerprint(artifact: &str) -> String {
    let digest = Sha256::digest(artifact.as_bytes());
    let mut encoded = String::with_capacity(digest.len().saturating_mul(2));
    for byte in digest {
        for nibble in [byte >> 4, byte & 0x0f] {
            if let Some(digit) = char::from_digit(u32::from(nibble), 16) {
                encoded.push(digit);
            }
        }
    }
    encoded
}

/// Returns the issues of the newest record that also appear in each of the
/// last [`RECURRENCE_WINDOW`] records, the newest one included.
///
/// Matching is exact string equality. The result is empty until the history
/// holds a full window of records.
#[must_use]
pub fn recurring_issues(history: &[IterationRecord]) -> BTreeSet<String> {
    let Some(current) = history.last() else {
        return BTreeSet::new();
    };
    if history.len() < RECURRENCE_WINDOW {
        return BTreeSet::new();
    }
    let mut recurring: BTreeSet<String> = current.issues.iter().cloned().collect();
    for record in history.iter().rev().take(RECURRENCE_WINDOW) {
        recurring.retain(|issue| record.issues.contains(issue));
    }
    recurring
}
