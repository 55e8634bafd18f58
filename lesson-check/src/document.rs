//! A lesson document ready for checking.

use std::path::{Path, PathBuf};

use lesson_tree::Node;
use serde_json::{Map, Value};

use crate::error::Location;
use crate::frontmatter::{parse_metadata, split_front_matter};
use crate::render::Render;
use crate::reporter::Reporter;

/// One parsed document: metadata plus rendered tree.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    /// Front matter mapping, if the document has one.
    pub metadata: Option<Map<String, Value>>,
    /// Lines taken by the front matter block, added to renderer locations.
    pub metadata_len: usize,
    pub tree: Node,
}

impl Document {
    /// Split, parse and render `text` read from `path`.
    ///
    /// A front matter block that does not parse is recorded as a finding and
    /// the document continues without metadata. A render failure is recorded
    /// as a finding and the document is dropped (`None`).
    pub fn parse(
        path: &Path,
        text: &str,
        renderer: &dyn Render,
        reporter: &mut Reporter,
    ) -> Option<Self> {
        let split = split_front_matter(text);

        let metadata = match split.raw_metadata.map(parse_metadata) {
            Some(Ok(metadata)) => metadata,
            Some(Err(e)) => {
                reporter.add(Some(Location::in_file(path)), format_args!("{e}"));
                None
            }
            None => None,
        };

        let tree = match renderer.render(split.body) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Renderer failed");
                reporter.add(
                    Some(Location::in_file(path)),
                    format_args!("Unable to render document: {e}"),
                );
                return None;
            }
        };

        Some(Self {
            path: path.to_path_buf(),
            metadata,
            metadata_len: split.metadata_len,
            tree,
        })
    }

    /// Location of `node` in the original file.
    ///
    /// Falls back to the whole file when the renderer gave the node no line.
    #[must_use]
    pub fn location_of(&self, node: &Node) -> Location {
        match node.location() {
            Some(line) => Location::at_line(&self.path, line + self.metadata_len),
            None => Location::in_file(&self.path),
        }
    }
}
