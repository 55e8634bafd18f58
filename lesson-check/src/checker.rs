//! Per-document checks.
//!
//! Each document is assigned a [`Role`] from its filename. The role decides
//! how its front matter is judged; the block-class rules are shared by all
//! roles.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use lesson_tree::{Pattern, find_all};
use regex::Regex;

use crate::config::LessonPolicy;
use crate::document::Document;
use crate::error::Location;
use crate::reporter::Reporter;

/// What a document is, as far as its front matter is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Repository documentation that is not part of the site.
    NonTemplated,
    /// The lesson home page.
    Index,
    /// The glossary / reference page.
    Reference,
    /// A numbered episode.
    Episode,
    /// Any other page.
    Generic,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonTemplated => write!(f, "non-templated page"),
            Self::Index => write!(f, "index page"),
            Self::Reference => write!(f, "reference page"),
            Self::Episode => write!(f, "episode"),
            Self::Generic => write!(f, "generic page"),
        }
    }
}

/// Front matter expectations for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerConfig {
    /// `true`: metadata must be present. `false`: metadata must be absent.
    pub requires_metadata: bool,
    /// Required value of the `layout` field, if any.
    pub expected_layout: Option<&'static str>,
}

impl Role {
    #[must_use]
    pub fn config(self) -> CheckerConfig {
        let (requires_metadata, expected_layout) = match self {
            Self::NonTemplated => (false, None),
            Self::Index => (true, Some("lesson_homepage")),
            Self::Reference => (true, Some("reference")),
            Self::Episode => (true, None),
            Self::Generic => (true, Some("page")),
        };
        CheckerConfig {
            requires_metadata,
            expected_layout,
        }
    }
}

/// Filename rules, checked in order; first match wins.
static DISPATCH: LazyLock<Vec<(Regex, Role)>> = LazyLock::new(|| {
    [
        (r"(?:^|/)CONTRIBUTING\.md$", Role::NonTemplated),
        (r"(?:^|/)README\.md$", Role::NonTemplated),
        (r"(?:^|/)index\.md$", Role::Index),
        (r"(?:^|/)reference\.md$", Role::Reference),
        (r"(?:^|/)_episodes/.*\.md$", Role::Episode),
        (r"\.md$", Role::Generic),
    ]
    .into_iter()
    .map(|(pattern, role)| match Regex::new(pattern) {
        Ok(regex) => (regex, role),
        Err(err) => panic!("Invalid dispatch regex {pattern}: {err}"),
    })
    .collect()
});

/// Pick the role for a document under `root`, or `None` if it is not a
/// `.md` file.
///
/// Only the part of `path` below `root` is matched, so directories above the
/// lesson never affect dispatch.
#[must_use]
pub fn role_for(root: &Path, path: &Path) -> Option<Role> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let normalized = relative.to_string_lossy().replace('\\', "/");
    DISPATCH
        .iter()
        .find(|(regex, _)| regex.is_match(&normalized))
        .map(|&(_, role)| role)
}

/// Checks one document under one role.
pub struct DocumentChecker<'a> {
    document: &'a Document,
    policy: &'a LessonPolicy,
    config: CheckerConfig,
}

impl<'a> DocumentChecker<'a> {
    #[must_use]
    pub fn new(document: &'a Document, role: Role, policy: &'a LessonPolicy) -> Self {
        Self {
            document,
            policy,
            config: role.config(),
        }
    }

    /// Run every rule. Rules never stop each other.
    pub fn check(&self, reporter: &mut Reporter) {
        self.check_metadata(reporter);
        self.check_blockquote_classes(reporter);
        self.check_codeblock_classes(reporter);
    }

    pub fn check_metadata(&self, reporter: &mut Reporter) {
        let location = Location::in_file(&self.document.path);
        let metadata = self.document.metadata.as_ref();

        if !self.config.requires_metadata {
            reporter.check(
                metadata.is_none(),
                Some(location),
                format_args!("Unexpected YAML header"),
            );
            return;
        }

        let Some(metadata) = metadata else {
            reporter.add(Some(location), format_args!("Missing metadata entirely"));
            return;
        };
        if let Some(layout) = self.config.expected_layout {
            reporter.check_field(Some(location), "metadata", metadata, "layout", layout);
        }
    }

    pub fn check_blockquote_classes(&self, reporter: &mut Reporter) {
        self.check_classes(reporter, "blockquote", &self.policy.blockquote_classes);
    }

    pub fn check_codeblock_classes(&self, reporter: &mut Reporter) {
        self.check_classes(reporter, "codeblock", &self.policy.codeblock_classes);
    }

    fn check_classes(&self, reporter: &mut Reporter, kind: &str, known: &BTreeSet<String>) {
        for node in find_all(&self.document.tree, &Pattern::of_type(kind)) {
            let class = node.attribute("class");
            reporter.check(
                class.is_some_and(|c| known.contains(c)),
                Some(self.document.location_of(node)),
                format_args!(
                    "Unknown or missing {kind} type {}",
                    class.unwrap_or("(none)")
                ),
            );
        }
    }
}
