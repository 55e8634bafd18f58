//! Finding types for lesson checking.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Where a finding applies: a document, optionally narrowed to a line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct Location {
    /// Document path as discovered under the source root.
    pub file: PathBuf,
    /// 1-indexed line in the original file (front matter included).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    /// A finding about a whole document.
    #[must_use]
    pub fn in_file(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            line: None,
        }
    }

    /// A finding about a specific line of a document.
    #[must_use]
    pub fn at_line(file: &Path, line: usize) -> Self {
        Self {
            file: file.to_path_buf(),
            line: Some(line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file.display()),
            None => write!(f, "{}", self.file.display()),
        }
    }
}

/// A single recorded validation failure.
///
/// Findings without a location describe the lesson as a whole (missing
/// files, episode numbering).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct Finding {
    pub location: Option<Location>,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    #[must_use]
    pub fn new(location: Option<Location>, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// Format the finding for human-readable output.
    ///
    /// `{file}:{line}: {message}`, `{file}: {message}`, or just `{message}`
    /// for lesson-level findings.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        match &self.location {
            Some(location) => format!("{location}: {}", self.message),
            None => self.message.clone(),
        }
    }
}
