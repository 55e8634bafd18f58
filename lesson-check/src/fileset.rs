//! Checks over the discovered document set as a whole.
//!
//! - every mandatory manifest file is present
//! - episode filenames follow `NN-slug.md`
//! - episode numbers are unique and run 1..N without gaps

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{EPISODE_DIR, LessonPolicy};
use crate::reporter::Reporter;

/// Episode filename: two ASCII digits, hyphen, slug, `.md`, directly under the
/// episode directory.
static EPISODE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"(?:^|/)_episodes/([0-9]{2})-[-\w]+\.md$") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid episode filename regex: {err}"),
    }
});

/// Run all set-level checks.
pub fn check_fileset(
    root: &Path,
    policy: &LessonPolicy,
    discovered: &[PathBuf],
    reporter: &mut Reporter,
) {
    check_required_files(root, policy, discovered, reporter);
    let numbers = collect_episode_numbers(root, discovered, reporter);
    check_episode_numbers(&numbers, reporter);
}

/// Report every mandatory manifest file missing from `discovered`.
///
/// Missing optional files are only logged.
pub fn check_required_files(
    root: &Path,
    policy: &LessonPolicy,
    discovered: &[PathBuf],
    reporter: &mut Reporter,
) {
    let present: BTreeSet<&Path> = discovered.iter().map(PathBuf::as_path).collect();
    for required in &policy.required_files {
        let path = required.resolve(root);
        if present.contains(path.as_path()) {
            continue;
        }
        if required.mandatory {
            reporter.add(None, format_args!("Missing required file {}", path.display()));
        } else {
            tracing::warn!(path = %path.display(), "Optional lesson file is missing");
        }
    }
}

/// Extract the two-digit prefix from an episode path, if well formed.
#[must_use]
pub fn episode_number(path: &Path) -> Option<String> {
    let normalized = path.to_string_lossy().replace('\\', "/");
    EPISODE_FILENAME
        .captures(&normalized)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Collect episode numbers, reporting episode files with malformed names.
pub fn collect_episode_numbers(
    root: &Path,
    discovered: &[PathBuf],
    reporter: &mut Reporter,
) -> Vec<String> {
    let episode_dir = root.join(EPISODE_DIR);
    let mut numbers = Vec::new();
    for path in discovered.iter().filter(|p| p.starts_with(&episode_dir)) {
        match episode_number(path) {
            Some(number) => numbers.push(number),
            None => reporter.add(
                None,
                format_args!("Episode {} has badly-formatted filename", path.display()),
            ),
        }
    }
    numbers
}

/// Check that episode numbers are unique and contiguous from 1.
///
/// The gap check runs on the distinct numbers, so a duplicate alone is
/// reported once.
pub fn check_episode_numbers(numbers: &[String], reporter: &mut Reporter) {
    let mut raw: Vec<&str> = numbers.iter().map(String::as_str).collect();
    raw.sort_unstable();
    let mut distinct = raw.clone();
    distinct.dedup();
    reporter.check(
        raw.len() == distinct.len(),
        None,
        format_args!("Duplicate episode numbers {raw:?} vs {distinct:?}"),
    );

    let mut parsed: Vec<u32> = Vec::with_capacity(numbers.len());
    let mut unparsed: Vec<&str> = Vec::new();
    for number in numbers {
        match number.parse() {
            Ok(value) => parsed.push(value),
            Err(_) => unparsed.push(number),
        }
    }
    reporter.check(
        unparsed.is_empty(),
        None,
        format_args!("Episode numbers are not decimal {unparsed:?}"),
    );

    parsed.sort_unstable();
    let mut unique = parsed.clone();
    unique.dedup();
    let contiguous = unique.iter().zip(1u32..).all(|(&actual, expected)| actual == expected);
    reporter.check(
        contiguous,
        None,
        format_args!("Missing or non-consecutive episode numbers {parsed:?}"),
    );
}
