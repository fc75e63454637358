//! CST-preserving mutations. Every function re-parses `text` fresh (per
//! spec.md §5: "the engine reads a fresh CST per edit"), locates its target
//! through a dot-path, and splices a minimal replacement into the original
//! bytes so untouched comments and whitespace survive verbatim. Mutations on
//! an unresolvable path are silent no-ops that return `text` unchanged.

use super::node::CstNode;
use super::parser::parse;
use super::path::{parse_dot_path, resolve_entry, resolve_node, PathSegment};
use super::value::YamlValue;

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_end_inclusive(text: &str, offset: usize) -> usize {
    match text[offset..].find('\n') {
        Some(i) => offset + i + 1,
        None => text.len(),
    }
}

fn indent_at(text: &str, offset: usize) -> usize {
    offset - line_start(text, offset)
}

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s != s.trim() {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.contains('\n') {
        return true;
    }
    matches!(
        s,
        "null" | "Null" | "NULL" | "~" | "true" | "True" | "TRUE" | "false" | "False" | "FALSE"
    ) || s.parse::<f64>().is_ok()
        || matches!(s.chars().next(), Some('-' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'))
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn serialize_scalar(value: &YamlValue) -> String {
    match value {
        YamlValue::Null => "null".to_owned(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Int(n) => n.to_string(),
        YamlValue::Float(f) => f.to_string(),
        YamlValue::String(s) => {
            if needs_quoting(s) {
                quote(s)
            } else {
                s.clone()
            }
        }
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => serialize_flow(value),
    }
}

/// Serializes any value (including nested collections) as inline flow YAML,
/// e.g. `{to: target}` or `[a, b]`. Used when a whole composite value is
/// replaced or inserted — newly written nodes are always flow-style even if
/// sibling nodes use block style, a known simplification (see DESIGN.md).
pub fn serialize_flow(value: &YamlValue) -> String {
    match value {
        YamlValue::Mapping(entries) => {
            let body = entries
                .iter()
                .map(|(k, v)| format!("{k}: {}", serialize_scalar_or_flow(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{body}}}")
        }
        YamlValue::Sequence(items) => {
            let body = items
                .iter()
                .map(serialize_scalar_or_flow)
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{body}]")
        }
        scalar => serialize_scalar(scalar),
    }
}

fn serialize_scalar_or_flow(value: &YamlValue) -> String {
    match value {
        YamlValue::Mapping(_) | YamlValue::Sequence(_) => serialize_flow(value),
        scalar => serialize_scalar(scalar),
    }
}

fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[end..]);
    out
}

/// Parses `text`, resolves `path`, and replaces the node's full byte range
/// with `new_value`'s serialized form.
pub fn edit_value(text: &str, path: &str, new_value: &YamlValue) -> String {
    let Ok((_, cst)) = parse(text) else {
        return text.to_owned();
    };
    let segments = parse_dot_path(path);
    let Some(node) = resolve_node(&cst, &segments) else {
        return text.to_owned();
    };
    let range = node.range();
    let replacement = match node {
        CstNode::Scalar { .. } => serialize_scalar(new_value),
        CstNode::Mapping { .. } | CstNode::Sequence { .. } => serialize_flow(new_value),
    };
    splice(text, range.start_offset, range.end_offset, &replacement)
}

/// Adds `key: value` under the mapping at `parent_path` (empty path = root).
/// A no-op if `parent_path` doesn't resolve to a mapping, or already has `key`.
pub fn add_map_entry(text: &str, parent_path: &str, key: &str, value: &YamlValue) -> String {
    let Ok((_, cst)) = parse(text) else {
        return text.to_owned();
    };
    let segments = parse_dot_path(parent_path);
    let parent = if segments.is_empty() {
        Some(&cst)
    } else {
        resolve_node(&cst, &segments)
    };
    let Some(CstNode::Mapping { range, entries }) = parent else {
        return text.to_owned();
    };
    if entries.iter().any(|entry| entry.key == key) {
        return text.to_owned();
    }

    let value_str = serialize_scalar_or_flow(value);
    match entries.last() {
        Some(last) => {
            let indent = indent_at(text, last.key_range.start_offset);
            let insert_at = line_end_inclusive(text, last.value.range().end_offset);
            let line = format!("{}{key}: {value_str}\n", " ".repeat(indent));
            splice(text, insert_at, insert_at, &line)
        }
        None => {
            let indent = indent_at(text, range.start_offset.min(text.len())) + 2;
            let insert_at = range.start_offset;
            let line = format!("{}{key}: {value_str}\n", " ".repeat(indent));
            splice(text, insert_at, insert_at, &line)
        }
    }
}

/// Appends `value` to the sequence at `parent_path`. New items are written
/// in flow/scalar style on a single line (see DESIGN.md limitation note).
pub fn append_to_sequence(text: &str, parent_path: &str, value: &YamlValue) -> String {
    let Ok((_, cst)) = parse(text) else {
        return text.to_owned();
    };
    let segments = parse_dot_path(parent_path);
    let parent = if segments.is_empty() {
        Some(&cst)
    } else {
        resolve_node(&cst, &segments)
    };
    let Some(CstNode::Sequence { range, items }) = parent else {
        return text.to_owned();
    };

    let value_str = serialize_scalar_or_flow(value);
    match items.last() {
        Some(last) => {
            let value_line_indent = indent_at(text, last.value.range().start_offset);
            let dash_indent = value_line_indent.saturating_sub(2);
            let insert_at = line_end_inclusive(text, last.value.range().end_offset);
            let line = format!("{}- {value_str}\n", " ".repeat(dash_indent));
            splice(text, insert_at, insert_at, &line)
        }
        None => {
            let indent = indent_at(text, range.start_offset.min(text.len())) + 2;
            let insert_at = range.start_offset;
            let line = format!("{}- {value_str}\n", " ".repeat(indent));
            splice(text, insert_at, insert_at, &line)
        }
    }
}

/// Deletes the mapping entry or sequence item named by `path`'s last segment.
pub fn delete_entry(text: &str, path: &str) -> String {
    let Ok((_, cst)) = parse(text) else {
        return text.to_owned();
    };
    let segments = parse_dot_path(path);
    let Some((last, init)) = segments.split_last() else {
        return text.to_owned();
    };
    let parent = if init.is_empty() {
        Some(&cst)
    } else {
        resolve_node(&cst, init)
    };
    let Some(parent) = parent else {
        return text.to_owned();
    };

    match (last, parent) {
        (PathSegment::Key(_), _) => {
            let Some(entry) = resolve_entry(&cst, &segments) else {
                return text.to_owned();
            };
            let start = line_start(text, entry.key_range.start_offset);
            let end = line_end_inclusive(text, entry.value.range().end_offset.max(entry.key_range.end_offset));
            splice(text, start, end, "")
        }
        (PathSegment::Index(index), CstNode::Sequence { items, .. }) => {
            let Some(item) = items.get(*index) else {
                return text.to_owned();
            };
            let item_start = line_start(text, item.value.range().start_offset);
            let start = item_start.min(line_start(text, item.value.range().start_offset.saturating_sub(2)));
            let end = line_end_inclusive(text, item.value.range().end_offset);
            splice(text, start, end, "")
        }
        _ => text.to_owned(),
    }
}
