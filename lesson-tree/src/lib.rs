//! Rendered document tree and pattern matching primitives.
//!
//! An external renderer turns a lesson document body into a tree of [`Node`]s
//! encoded as JSON. This crate decodes that tree and provides the small query
//! language the checker uses on it:
//!
//! - [`matches`] tests a single node against a [`Pattern`]
//! - [`find_all`] collects every matching node in depth-first pre-order
//! - [`get_field`] walks a chain of field names, giving up quietly on the first miss
//!
//! Field access goes through the [`Fields`] trait so that patterns can reach
//! into nested records (e.g. the `attr` map of a node) with the same rules
//! used for the node itself.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Key under a node's `options` record holding its source line.
pub const LOCATION_KEY: &str = "location";

/// Errors from decoding a rendered tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The renderer output is not a JSON document of the expected node shape.
    #[error("Malformed document tree: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One element of a rendered document.
///
/// `type`, `attr`, `options` and `children` are the fields every node may
/// carry. Anything else the renderer emits is kept in `extra` so that
/// patterns can still match on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Type tag, e.g. `blockquote` or `codeblock`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Attribute map (`class`, `id`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<BTreeMap<String, String>>,
    /// Renderer options, including the source `location`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Create a childless node of the given type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Decode a node tree from renderer output.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Decode`] if `text` is not a JSON object of node shape.
    pub fn from_json(text: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(text)?)
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, line: usize) -> Self {
        self.options
            .get_or_insert_with(Map::new)
            .insert(LOCATION_KEY.to_owned(), Value::from(line));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Value of a single attribute, if the node has it.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attr.as_ref()?.get(name).map(String::as_str)
    }

    /// Source line recorded by the renderer, relative to the rendered body.
    #[must_use]
    pub fn location(&self) -> Option<usize> {
        let line = self.options.as_ref()?.get(LOCATION_KEY)?.as_u64()?;
        usize::try_from(line).ok()
    }
}

/// A field value as seen by the matcher.
#[derive(Clone, Copy)]
pub enum Field<'a> {
    Text(&'a str),
    Number(u64),
    Flag(bool),
    /// A nested record that can itself be matched against a [`Pattern`].
    Record(&'a dyn Fields),
}

impl<'a> Field<'a> {
    /// The field as a string, if it is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
            Self::Record(_) => f.write_str("Record(..)"),
        }
    }
}

/// Named-field access over node-shaped values.
pub trait Fields {
    /// Look up a field by name; `None` when absent.
    fn field(&self, name: &str) -> Option<Field<'_>>;
}

impl Fields for Node {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "type" => Some(Field::Text(&self.kind)),
            "attr" => self.attr.as_ref().map(|attr| Field::Record(attr)),
            "options" => self.options.as_ref().map(|options| Field::Record(options)),
            // Children are reached by traversal, never by pattern.
            "children" => None,
            other => self.extra.get(other).and_then(value_field),
        }
    }
}

impl Fields for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        self.get(name).map(|value| Field::Text(value))
    }
}

impl Fields for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        self.get(name).and_then(value_field)
    }
}

fn value_field(value: &Value) -> Option<Field<'_>> {
    match value {
        Value::String(text) => Some(Field::Text(text)),
        Value::Number(n) => n.as_u64().map(Field::Number),
        Value::Bool(b) => Some(Field::Flag(*b)),
        Value::Object(map) => Some(Field::Record(map)),
        Value::Null | Value::Array(_) => None,
    }
}

/// What a pattern expects of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// The field must be text equal to this value.
    Literal(String),
    /// The field must be a record satisfying this pattern.
    Nested(Pattern),
}

/// A partial description of a node: every named field must match, every
/// other field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    fields: BTreeMap<String, Expected>,
}

impl Pattern {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a pattern that only constrains the node type.
    #[must_use]
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self::new().literal("type", kind)
    }

    #[must_use]
    pub fn literal(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), Expected::Literal(value.into()));
        self
    }

    #[must_use]
    pub fn nested(mut self, field: impl Into<String>, pattern: Pattern) -> Self {
        self.fields.insert(field.into(), Expected::Nested(pattern));
        self
    }

    /// The constrained fields, in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Expected)> {
        self.fields.iter().map(|(name, expected)| (name.as_str(), expected))
    }
}

/// Test whether `node` satisfies `pattern`.
///
/// A field the pattern names but the node lacks is a plain mismatch. An
/// empty pattern matches everything.
#[must_use]
pub fn matches(node: &dyn Fields, pattern: &Pattern) -> bool {
    pattern
        .fields
        .iter()
        .all(|(name, expected)| match (node.field(name), expected) {
            (Some(Field::Text(actual)), Expected::Literal(want)) => actual == want,
            (Some(Field::Record(record)), Expected::Nested(inner)) => matches(record, inner),
            _ => false,
        })
}

/// Collect every node in the tree rooted at `node` that satisfies `pattern`.
///
/// Depth-first, pre-order, root included. A matching node does not stop
/// the search from descending into its children.
#[must_use]
pub fn find_all<'a>(node: &'a Node, pattern: &Pattern) -> Vec<&'a Node> {
    let mut found = Vec::new();
    collect(node, pattern, &mut found);
    found
}

fn collect<'a>(node: &'a Node, pattern: &Pattern, found: &mut Vec<&'a Node>) {
    if matches(node, pattern) {
        found.push(node);
    }
    for child in &node.children {
        collect(child, pattern, found);
    }
}

/// Follow `path` one field at a time from `node`.
///
/// Returns `None` as soon as a step is missing or a non-record value is
/// found before the end of the path. An empty path yields the node itself.
#[must_use]
pub fn get_field<'a>(node: &'a dyn Fields, path: &[&str]) -> Option<Field<'a>> {
    let mut current = Field::Record(node);
    for name in path {
        let Field::Record(record) = current else {
            return None;
        };
        current = record.field(name)?;
    }
    Some(current)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_tree() -> Node {
        Node::new("root")
            .with_child(
                Node::new("blockquote")
                    .with_attr("class", "callout")
                    .with_location(3)
                    .with_child(
                        Node::new("blockquote")
                            .with_attr("class", "solution")
                            .with_location(5),
                    ),
            )
            .with_child(Node::new("p").with_location(9))
            .with_child(
                Node::new("codeblock")
                    .with_attr("class", "source")
                    .with_location(11),
            )
    }

    // ---- decoding ----

    #[test]
    fn test_from_json_renderer_shape() {
        let text = r#"{
            "type": "root",
            "attr": {},
            "options": {"encoding": "UTF-8", "location": 1},
            "children": [
                {"type": "codeblock", "value": "print(1)\n",
                 "attr": {"class": "language-python"},
                 "options": {"location": 4}, "children": []}
            ]
        }"#;
        let node = Node::from_json(text).unwrap();
        assert_eq!(node.kind, "root");
        assert_eq!(node.location(), Some(1));
        let code = &node.children[0];
        assert_eq!(code.attribute("class"), Some("language-python"));
        assert_eq!(code.location(), Some(4));
        assert_eq!(
            code.field("value").and_then(|f| f.as_text()),
            Some("print(1)\n")
        );
    }

    #[test]
    fn test_from_json_null_attr_is_absent() {
        let node = Node::from_json(r#"{"type": "text", "attr": null}"#).unwrap();
        assert!(node.attr.is_none());
        assert!(node.attribute("class").is_none());
        assert!(node.location().is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Node::from_json("not json"),
            Err(TreeError::Decode(_))
        ));
        assert!(Node::from_json(r#"{"children": []}"#).is_err());
    }

    // ---- matches ----

    #[test]
    fn test_matches_literal_and_extra_fields_ignored() {
        let node = Node::new("blockquote").with_attr("class", "callout");
        assert!(matches(&node, &Pattern::of_type("blockquote")));
        assert!(!matches(&node, &Pattern::of_type("codeblock")));
        assert!(matches(&node, &Pattern::new()));
    }

    #[test]
    fn test_matches_nested_pattern() {
        let node = Node::new("blockquote").with_attr("class", "callout");
        let hit = Pattern::of_type("blockquote")
            .nested("attr", Pattern::new().literal("class", "callout"));
        let miss = Pattern::of_type("blockquote")
            .nested("attr", Pattern::new().literal("class", "prereq"));
        assert!(matches(&node, &hit));
        assert!(!matches(&node, &miss));
    }

    #[test]
    fn test_matches_missing_field_is_mismatch() {
        let node = Node::new("p");
        let pattern = Pattern::new().nested("attr", Pattern::new().literal("class", "x"));
        assert!(!matches(&node, &pattern));
        assert!(!matches(&node, &Pattern::new().literal("value", "x")));
    }

    #[test]
    fn test_matches_kind_mismatch_between_literal_and_record() {
        let node = Node::new("blockquote").with_attr("class", "callout");
        assert!(!matches(&node, &Pattern::new().literal("attr", "callout")));
        assert!(!matches(&node, &Pattern::new().nested("type", Pattern::new())));
    }

    // ---- find_all ----

    #[test]
    fn test_find_all_pre_order_including_nested_matches() {
        let tree = sample_tree();
        let found = find_all(&tree, &Pattern::of_type("blockquote"));
        let classes: Vec<_> = found.iter().map(|n| n.attribute("class")).collect();
        assert_eq!(classes, vec![Some("callout"), Some("solution")]);
    }

    #[test]
    fn test_find_all_includes_root() {
        let tree = sample_tree();
        let found = find_all(&tree, &Pattern::new());
        let kinds: Vec<_> = found.iter().map(|n| n.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["root", "blockquote", "blockquote", "p", "codeblock"]
        );
    }

    #[test]
    fn test_find_all_no_match() {
        let tree = sample_tree();
        assert!(find_all(&tree, &Pattern::of_type("table")).is_empty());
    }

    // ---- get_field ----

    #[test]
    fn test_get_field_chain() {
        let node = Node::new("codeblock")
            .with_attr("class", "output")
            .with_location(7);
        assert_eq!(
            get_field(&node, &["attr", "class"]).and_then(|f| f.as_text()),
            Some("output")
        );
        assert_eq!(
            get_field(&node, &["options", LOCATION_KEY]).and_then(|f| f.as_number()),
            Some(7)
        );
    }

    #[test]
    fn test_get_field_missing_steps() {
        let node = Node::new("codeblock");
        assert!(get_field(&node, &["attr", "class"]).is_none());
        assert!(get_field(&node, &["type", "class"]).is_none());
        assert!(get_field(&node, &["nope"]).is_none());
    }

    #[test]
    fn test_get_field_empty_path_is_node() {
        let node = Node::new("p");
        assert!(matches!(get_field(&node, &[]), Some(Field::Record(_))));
    }
}
