//! Comment-preserving YAML parsing and editing (the `YamlCst` component).
//!
//! [`ParsedYaml`] pairs a plain [`YamlValue`] data tree with a [`CstNode`]
//! that additionally carries byte ranges and comments, so callers can map a
//! dot-path both to a decoded value and to the exact source text it came
//! from. Edits are pure functions over `&str` — they never mutate in place,
//! matching spec.md §4.1's "edits return new text, the caller owns saving it".

pub mod edit;
pub mod error;
pub mod node;
pub mod parser;
pub mod path;
pub mod value;

use crate::model::SourceRange;
pub use error::YamlParseError;
pub use node::{CstMapEntry, CstNode, CstSeqItem};
pub use path::PathSegment;
pub use value::YamlValue;

/// A parsed document: the decoded value tree plus its concrete syntax tree
/// and the source text both were built from.
#[derive(Debug, Clone)]
pub struct ParsedYaml {
    pub data: YamlValue,
    pub cst: CstNode,
    pub text: String,
}

impl ParsedYaml {
    pub fn parse(text: impl Into<String>) -> Result<Self, YamlParseError> {
        let text = text.into();
        let (data, cst) = parser::parse(&text)?;
        Ok(Self { data, cst, text })
    }

    /// The byte range of the value found at `path`, or `None` if it doesn't resolve.
    pub fn get_source_range(&self, path: &str) -> Option<SourceRange> {
        let segments = path::parse_dot_path(path);
        path::resolve_node(&self.cst, &segments).map(CstNode::range)
    }

    /// The byte range spanning from a mapping entry's key to the end of its
    /// value, for callers that need to select or replace a whole `key: value` pair.
    pub fn get_map_entry_range(&self, path: &str) -> Option<SourceRange> {
        let segments = path::parse_dot_path(path);
        let entry = path::resolve_entry(&self.cst, &segments)?;
        Some(entry.key_range.merge(&entry.value.range()))
    }

    /// Finds the innermost node whose range contains `offset`, along with the
    /// dot-path segments leading to it. Used by `SourceSync` to map a cursor
    /// position back to a tree selection.
    pub fn find_node_at_offset(&self, offset: usize) -> Option<(Vec<PathSegment>, &CstNode)> {
        find_at_offset(&self.cst, offset, Vec::new())
    }

    pub fn edit_value(&self, path: &str, new_value: &YamlValue) -> String {
        edit::edit_value(&self.text, path, new_value)
    }

    pub fn add_map_entry(&self, parent_path: &str, key: &str, value: &YamlValue) -> String {
        edit::add_map_entry(&self.text, parent_path, key, value)
    }

    pub fn append_to_sequence(&self, parent_path: &str, value: &YamlValue) -> String {
        edit::append_to_sequence(&self.text, parent_path, value)
    }

    pub fn delete_entry(&self, path: &str) -> String {
        edit::delete_entry(&self.text, path)
    }
}

fn find_at_offset(node: &CstNode, offset: usize, prefix: Vec<PathSegment>) -> Option<(Vec<PathSegment>, &CstNode)> {
    if !node.range().contains_offset(offset) && node.range().len() > 0 {
        return None;
    }
    match node {
        CstNode::Mapping { entries, .. } => {
            for entry in entries {
                if entry.value.range().contains_offset(offset) {
                    let mut next = prefix.clone();
                    next.push(PathSegment::Key(entry.key.clone()));
                    if let Some(found) = find_at_offset(&entry.value, offset, next.clone()) {
                        return Some(found);
                    }
                    return Some((next, &entry.value));
                }
            }
            Some((prefix, node))
        }
        CstNode::Sequence { items, .. } => {
            for (index, item) in items.iter().enumerate() {
                if item.value.range().contains_offset(offset) {
                    let mut next = prefix.clone();
                    next.push(PathSegment::Index(index));
                    if let Some(found) = find_at_offset(&item.value, offset, next.clone()) {
                        return Some(found);
                    }
                    return Some((next, &item.value));
                }
            }
            Some((prefix, node))
        }
        CstNode::Scalar { .. } => Some((prefix, node)),
    }
}
