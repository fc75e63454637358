use super::node::{CstMapEntry, CstNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parses a dot-path like `"nodes.start.label"` or `"edges.0.to"`, treating
/// purely-numeric segments as sequence indices (spec.md §4.1).
pub fn parse_dot_path(path: &str) -> Vec<PathSegment> {
    path.split('.')
        .filter(|s| !s.is_empty())
        .map(|segment| match segment.parse::<usize>() {
            Ok(index) => PathSegment::Index(index),
            Err(_) => PathSegment::Key(segment.to_owned()),
        })
        .collect()
}

/// Resolves a path to its target node.
pub fn resolve_node<'a>(root: &'a CstNode, segments: &[PathSegment]) -> Option<&'a CstNode> {
    let mut current = root;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Key(key), node) => &node.find_entry(key)?.value,
            (PathSegment::Index(index), node) => &node.as_sequence()?.get(*index)?.value,
        };
    }
    Some(current)
}

/// Resolves a path to the mapping entry that owns its *last* segment, so
/// callers can read `key_range`/comments alongside the value.
pub fn resolve_entry<'a>(root: &'a CstNode, segments: &[PathSegment]) -> Option<&'a CstMapEntry> {
    let (last, init) = segments.split_last()?;
    let PathSegment::Key(key) = last else {
        return None;
    };
    let parent = if init.is_empty() {
        root
    } else {
        resolve_node(root, init)?
    };
    parent.find_entry(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parser::parse;

    #[test]
    fn resolves_nested_key_path() {
        let (_value, cst) = parse("nodes:\n  start:\n    label: Begin\n").expect("parse");
        let segments = parse_dot_path("nodes.start.label");
        let node = resolve_node(&cst, &segments).expect("node");
        assert!(matches!(node, CstNode::Scalar { .. }));
    }

    #[test]
    fn resolves_numeric_segment_as_index() {
        let (_value, cst) = parse("edges:\n  - from: a\n    to: b\n  - from: b\n    to: c\n").expect("parse");
        let segments = parse_dot_path("edges.1.to");
        let node = resolve_node(&cst, &segments).expect("node");
        assert_eq!(node.range().slice("edges:\n  - from: a\n    to: b\n  - from: b\n    to: c\n"), "c");
    }
}
