//! Configuration types for lesson checking.
//!
//! Split into the content policy (what a lesson must look like) and the
//! source config (where the lesson lives on disk). Both are built once and
//! passed explicitly into the checks.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Directory holding the numbered episodes.
pub const EPISODE_DIR: &str = "_episodes";

/// Directory holding extra pages (discussion, figures, guide).
pub const EXTRAS_DIR: &str = "_extras";

/// Directories scanned for documents, relative to the source root.
/// The empty entry is the root itself.
pub const SOURCE_DIRS: &[&str] = &["", EPISODE_DIR, EXTRAS_DIR];

/// Placeholder replaced by the source root in required-file templates.
pub const ROOT_PLACEHOLDER: char = '%';

const BLOCKQUOTE_CLASSES: &[&str] = &[
    "callout",
    "challenge",
    "checklist",
    "keypoints",
    "objectives",
    "prereq",
    "solution",
    "testimonial",
];

const CODEBLOCK_CLASSES: &[&str] = &["error", "output", "source"];

const REQUIRED_FILES: &[(bool, &str)] = &[
    (true, "%/CONDUCT.md"),
    (false, "%/CONTRIBUTING.md"),
    (true, "%/LICENSE.md"),
    (false, "%/README.md"),
    (true, "%/_extras/discuss.md"),
    (true, "%/_extras/figures.md"),
    (true, "%/_extras/guide.md"),
    (true, "%/index.md"),
    (true, "%/reference.md"),
    (true, "%/setup.md"),
];

/// One entry of the required-file manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RequiredFile {
    /// Missing mandatory files are findings; missing optional files are only logged.
    pub mandatory: bool,
    /// Path with `%` standing for the source root, e.g. `%/LICENSE.md`.
    pub template: String,
}

impl RequiredFile {
    #[must_use]
    pub fn new(mandatory: bool, template: impl Into<String>) -> Self {
        Self {
            mandatory,
            template: template.into(),
        }
    }

    /// Substitute the source root into the template.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let root = root.to_string_lossy();
        PathBuf::from(self.template.replace(ROOT_PLACEHOLDER, &root))
    }
}

/// The fixed content policy a lesson is checked against.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LessonPolicy {
    /// Classes a blockquote may carry.
    pub blockquote_classes: BTreeSet<String>,
    /// Classes a code block may carry.
    pub codeblock_classes: BTreeSet<String>,
    /// Files every lesson must ship, in reporting order.
    pub required_files: Vec<RequiredFile>,
}

impl Default for LessonPolicy {
    fn default() -> Self {
        Self {
            blockquote_classes: BLOCKQUOTE_CLASSES.iter().map(|&c| c.to_owned()).collect(),
            codeblock_classes: CODEBLOCK_CLASSES.iter().map(|&c| c.to_owned()).collect(),
            required_files: REQUIRED_FILES
                .iter()
                .map(|&(mandatory, template)| RequiredFile::new(mandatory, template))
                .collect(),
        }
    }
}

/// Filesystem-specific source options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SourceConfig {
    /// Root directory of the lesson (default: current directory).
    pub root: PathBuf,
    /// Maximum document size in bytes (default: 10 MB).
    pub max_file_size: u64,
}

impl SourceConfig {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_file_size: 10_485_760,
        }
    }
}
