//! Validation report types.

use serde::Serialize;

use crate::error::Finding;
use crate::reporter::exit_status_for;

/// Result of a validation run.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ValidationReport {
    /// Number of `.md` documents discovered under the source root.
    pub documents_found: usize,
    /// Number of documents that were read, rendered and checked.
    pub documents_checked: usize,
    /// Whether the run produced no findings at all.
    pub ok: bool,
    /// Every finding, in the order it was recorded.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    #[must_use]
    pub fn new(documents_found: usize, documents_checked: usize, findings: Vec<Finding>) -> Self {
        Self {
            documents_found,
            documents_checked,
            ok: findings.is_empty(),
            findings,
        }
    }

    /// Number of findings recorded.
    #[must_use]
    pub fn findings_count(&self) -> usize {
        self.findings.len()
    }

    /// Process exit status: `0` when clean, `1` otherwise.
    #[must_use]
    pub fn exit_status(&self) -> i32 {
        exit_status_for(&self.findings)
    }
}
