//! YAML front matter handling.
//!
//! A document may open with a metadata block between two `---` markers.
//! The block is split off before rendering and its newline count is kept so
//! that renderer line numbers can be mapped back onto the original file.

use serde_json::{Map, Value};
use thiserror::Error;

/// Front matter delimiter.
pub const DELIMITER: &str = "---";

/// Errors from parsing a front matter block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// The block is not valid YAML.
    #[error("Unable to parse YAML header: {0}")]
    Yaml(String),
    /// The block parsed, but to something other than a mapping.
    #[error("YAML header is {0}, not a mapping")]
    NotMapping(&'static str),
}

/// A document split into its front matter and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    /// Raw text between the first two delimiters, if there were two.
    pub raw_metadata: Option<&'a str>,
    /// Number of newlines in the raw block; the body's line offset.
    pub metadata_len: usize,
    /// Text handed to the renderer.
    pub body: &'a str,
}

/// Split `text` on the first two `---` delimiters.
///
/// With fewer than two delimiters the whole text is the body and there is
/// no metadata.
#[must_use]
pub fn split_front_matter(text: &str) -> SplitDocument<'_> {
    let mut pieces = text.splitn(3, DELIMITER).skip(1);
    match (pieces.next(), pieces.next()) {
        (Some(raw), Some(body)) => SplitDocument {
            raw_metadata: Some(raw),
            metadata_len: raw.matches('\n').count(),
            body,
        },
        _ => SplitDocument {
            raw_metadata: None,
            metadata_len: 0,
            body: text,
        },
    }
}

/// Parse a raw front matter block into a mapping.
///
/// An empty block yields `Ok(None)`, as if there were no front matter.
///
/// # Errors
///
/// Returns [`MetadataError`] if the block is not YAML or not a mapping.
pub fn parse_metadata(raw: &str) -> Result<Option<Map<String, Value>>, MetadataError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_saphyr::from_str(raw).map_err(|e| MetadataError::Yaml(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        Value::Bool(_) => Err(MetadataError::NotMapping("a boolean")),
        Value::Number(_) => Err(MetadataError::NotMapping("a number")),
        Value::String(_) => Err(MetadataError::NotMapping("a string")),
        Value::Array(_) => Err(MetadataError::NotMapping("a sequence")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_front_matter() {
        let text = "---\nlayout: page\ntitle: Setup\n---\nBody line\n";
        let split = split_front_matter(text);
        assert_eq!(split.raw_metadata, Some("\nlayout: page\ntitle: Setup\n"));
        assert_eq!(split.metadata_len, 3);
        assert_eq!(split.body, "\nBody line\n");
    }

    #[test]
    fn test_split_offset_maps_body_lines_to_file_lines() {
        let text = "---\nlayout: page\n---\nfirst\nsecond\n";
        let split = split_front_matter(text);
        // "second" is body line 3 and file line 5.
        let body_line = split.body.lines().position(|l| l == "second").unwrap() + 1;
        let file_line = text.lines().position(|l| l == "second").unwrap() + 1;
        assert_eq!(body_line + split.metadata_len, file_line);
    }

    #[test]
    fn test_split_without_front_matter() {
        let text = "# Title\n\nNo header here.\n";
        let split = split_front_matter(text);
        assert_eq!(split.raw_metadata, None);
        assert_eq!(split.metadata_len, 0);
        assert_eq!(split.body, text);
    }

    #[test]
    fn test_split_single_delimiter_is_body() {
        let text = "intro\n---\nafter rule\n";
        let split = split_front_matter(text);
        assert!(split.raw_metadata.is_none());
        assert_eq!(split.body, text);
    }

    #[test]
    fn test_parse_mapping() {
        let map = parse_metadata("\nlayout: reference\ntitle: Glossary\n")
            .unwrap()
            .unwrap();
        assert_eq!(map["layout"], "reference");
        assert_eq!(map["title"], "Glossary");
    }

    #[test]
    fn test_parse_empty_block_is_absent() {
        assert_eq!(parse_metadata("\n"), Ok(None));
    }

    #[test]
    fn test_parse_scalar_is_not_mapping() {
        assert_eq!(
            parse_metadata("\njust text\n"),
            Err(MetadataError::NotMapping("a string"))
        );
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse_metadata("\nlayout: [unclosed\n").unwrap_err();
        assert!(matches!(err, MetadataError::Yaml(_)));
        assert!(err.to_string().starts_with("Unable to parse YAML header"));
    }
}
