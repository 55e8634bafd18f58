//! # lesson-check
//!
//! Structure, front matter and block-class checker for lesson repositories.
//!
//! A lesson is a directory of Markdown documents: top-level pages, numbered
//! episodes under `_episodes/` and extra pages under `_extras/`. The check
//! runs in two stages:
//!
//! 1. the document set as a whole (required files, episode names and numbering)
//! 2. every document on its own (front matter, blockquote and code block classes),
//!    using a tree produced by an external Markdown renderer
//!
//! Every problem becomes a [`Finding`]; nothing a lesson contains aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lesson_check::{CommandRenderer, LessonPolicy, Reporter, SourceConfig, check_lesson};
//!
//! let source = SourceConfig::new("my-lesson");
//! let renderer = CommandRenderer::new("bin/markdown_ast.rb");
//!
//! let report = check_lesson(&source, &LessonPolicy::default(), &renderer).unwrap();
//! let status = Reporter::from(report.findings)
//!     .report(&mut std::io::stderr())
//!     .unwrap();
//! std::process::exit(status);
//! ```

mod checker;
mod config;
mod discover;
mod document;
mod error;
mod fileset;
mod frontmatter;
pub mod output;
mod render;
mod report;
mod reporter;

pub use checker::{CheckerConfig, DocumentChecker, Role, role_for};
pub use config::{
    EPISODE_DIR, EXTRAS_DIR, LessonPolicy, RequiredFile, SOURCE_DIRS, SourceConfig,
};
pub use document::Document;
pub use error::{Finding, Location};
pub use fileset::{check_episode_numbers, check_fileset, episode_number};
pub use frontmatter::{MetadataError, SplitDocument, parse_metadata, split_front_matter};
pub use render::{CommandRenderer, Render, RenderError};
pub use report::ValidationReport;
pub use reporter::Reporter;

use discover::{find_documents, read_file_bounded};

/// Check the lesson rooted at `source.root`.
///
/// Each call starts from an empty [`Reporter`], so repeated runs over an
/// unchanged lesson give identical reports.
///
/// # Errors
///
/// Returns an error if the source root is not a directory. Every problem
/// inside the lesson is reported in [`ValidationReport::findings`] instead.
pub fn check_lesson(
    source: &SourceConfig,
    policy: &LessonPolicy,
    renderer: &dyn Render,
) -> anyhow::Result<ValidationReport> {
    if !source.root.is_dir() {
        anyhow::bail!("Source directory does not exist: {}", source.root.display());
    }

    let mut reporter = Reporter::new();
    let discovered = find_documents(&source.root, &mut reporter);

    check_fileset(&source.root, policy, &discovered, &mut reporter);

    let mut documents_checked: usize = 0;
    for path in &discovered {
        let text = match read_file_bounded(path, source.max_file_size) {
            Ok(text) => text,
            Err(message) => {
                reporter.add(Some(Location::in_file(path)), format_args!("{message}"));
                continue;
            }
        };

        let Some(document) = Document::parse(path, &text, renderer, &mut reporter) else {
            continue;
        };

        let Some(role) = role_for(&source.root, path) else {
            continue;
        };
        tracing::debug!(path = %path.display(), %role, "Checking document");
        DocumentChecker::new(&document, role, policy).check(&mut reporter);
        documents_checked += 1;
    }

    Ok(ValidationReport::new(
        discovered.len(),
        documents_checked,
        reporter.into_findings(),
    ))
}
