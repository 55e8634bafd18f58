//! Filesystem discovery of lesson documents.
//!
//! Documents are the `.md` files directly inside the source root and its
//! episode and extras directories. Subdirectories are not descended into.

use std::io::Read;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::SOURCE_DIRS;
use crate::error::Location;
use crate::reporter::Reporter;

/// Check if file has the document extension.
fn is_document(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Find all documents under `root`, sorted by path.
///
/// Missing source directories are skipped. Traversal errors are recorded in
/// `reporter` rather than aborting discovery.
pub fn find_documents(root: &Path, reporter: &mut Reporter) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for dir in SOURCE_DIRS {
        let dir_path = if dir.is_empty() {
            root.to_path_buf()
        } else {
            root.join(dir)
        };
        if !dir_path.is_dir() {
            tracing::debug!(dir = %dir_path.display(), "Source directory absent, skipping");
            continue;
        }

        for entry_result in WalkDir::new(&dir_path).min_depth(1).max_depth(1) {
            let entry = match entry_result {
                Ok(e) => e,
                Err(walk_err) => {
                    let path = walk_err
                        .path()
                        .map_or_else(|| dir_path.clone(), Path::to_path_buf);
                    reporter.add(
                        Some(Location::in_file(&path)),
                        format_args!("Directory traversal error: {walk_err}"),
                    );
                    continue;
                }
            };

            let file_path = entry.path();
            if file_path.is_file() && is_document(file_path) {
                files.push(file_path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!(count = files.len(), root = %root.display(), "Discovered documents");
    files
}

/// Read a document using a bounded read, enforcing `max_file_size`.
///
/// # Errors
///
/// Returns a human-readable message if the file cannot be opened or read,
/// exceeds `max_file_size`, or is not UTF-8.
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<String, String> {
    let file = std::fs::File::open(path).map_err(|e| format!("Failed to open file: {e}"))?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size + 1)
        .read_to_end(&mut buffer)
        .map_err(|e| format!("Failed to read file: {e}"))?;

    if buffer.len() as u64 > max_file_size {
        return Err(format!("File exceeds maximum size of {max_file_size} bytes"));
    }

    String::from_utf8(buffer).map_err(|_| "File is not valid UTF-8".to_owned())
}
