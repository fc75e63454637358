//! Pure text-in/text-out mutation helpers the coordinator's request
//! handlers delegate to, kept free of any host IO so they can be unit
//! tested directly (mirrors the teacher's `ops::ops_impl` split between the
//! CRDT mutation logic and the MCP tool handlers that call into it).

use crate::cst::{ParsedYaml, YamlValue};
use crate::model::EdgeLinks;
use crate::node_editor::json_pointer_to_path;
use crate::protocol::{ArrayItemEdit, EditInstruction};

/// `nodes.<id>` ids follow the same rules as every other [`crate::model::Id`]
/// segment: non-empty, no `/`, no `.` (dots are the dot-path separator).
pub fn is_valid_node_id(candidate: &str) -> bool {
    crate::model::Id::<()>::new(candidate).is_ok()
}

/// Applies each edit instruction to the running text in order; later edits
/// see the output of earlier ones (spec.md §5 ordering guarantee 2).
pub fn apply_edits(node_id: &str, edits: &[EditInstruction], text: &str) -> String {
    let mut text = text.to_owned();
    for edit in edits {
        let Ok(doc) = ParsedYaml::parse(&text) else {
            break;
        };
        let full_path = json_pointer_to_path(&format!("nodes.{node_id}"), &edit.path);
        let value = YamlValue::from(&edit.value);
        text = doc.edit_value(&full_path, &value);
    }
    text
}

/// Inserts a new node with just its label set to its own id, the minimal
/// value a blank node needs before the user fills in the rest.
pub fn insert_default_node(doc: &ParsedYaml, node_id: &str) -> String {
    let value = YamlValue::Mapping(vec![("label".to_owned(), YamlValue::String(node_id.to_owned()))]);
    doc.add_map_entry("nodes", node_id, &value)
}

/// Picks `<source>-copy`, then `<source>-copy-2`, `<source>-copy-3`, ... ,
/// the first candidate not already present.
pub fn generate_duplicate_id(source_id: &str, existing: &[String]) -> String {
    let base = format!("{source_id}-copy");
    if !existing.iter().any(|id| id == &base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !existing.iter().any(|id| id == &candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Clones a node's value with its outgoing-link array dropped, so a
/// duplicated node never starts out sharing the source's connections.
pub fn clone_without_field(value: &YamlValue, field_name: &str) -> YamlValue {
    match value {
        YamlValue::Mapping(entries) => {
            YamlValue::Mapping(entries.iter().filter(|(k, _)| k != field_name).cloned().collect())
        }
        other => other.clone(),
    }
}

/// Rewrites every reference to `old_id` as `new_id`, across either a
/// co-located per-node link array or a top-level edge list, whichever
/// `links` describes (spec.md §4.10 `requestRenameNode`).
pub fn rewrite_references(doc: &ParsedYaml, old_id: &str, new_id: &str, links: &EdgeLinks) -> String {
    let mut text = doc.text.clone();
    let mut current = doc.clone();

    if let Some(array_name) = links.colocated_array_name() {
        let node_ids: Vec<String> = current
            .data
            .get_path("nodes")
            .and_then(YamlValue::as_mapping)
            .map(|entries| entries.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default();

        for node_id in node_ids {
            let array_path = format!("nodes.{node_id}.{array_name}");
            let len = current.data.get_path(&array_path).and_then(YamlValue::as_sequence).map(<[_]>::len).unwrap_or(0);
            for index in 0..len {
                let field_path = format!("{array_path}.{index}.{}", links.to_field);
                if current.data.get_path(&field_path).and_then(YamlValue::as_str) == Some(old_id) {
                    text = current.edit_value(&field_path, &YamlValue::String(new_id.to_owned()));
                    current = ParsedYaml::parse(&text).unwrap_or(current);
                }
            }
        }
        return text;
    }

    let len = current.data.get_path(&links.source_path).and_then(YamlValue::as_sequence).map(<[_]>::len).unwrap_or(0);
    for index in 0..len {
        for field in [&links.from_field, &links.to_field] {
            let field_path = format!("{}.{index}.{field}", links.source_path);
            if current.data.get_path(&field_path).and_then(YamlValue::as_str) == Some(old_id) {
                text = current.edit_value(&field_path, &YamlValue::String(new_id.to_owned()));
                current = ParsedYaml::parse(&text).unwrap_or(current);
            }
        }
    }
    text
}

/// Appends `{<to_field>: target}` to a node's co-located link array,
/// creating the array if the node doesn't have one yet.
pub fn add_connection(doc: &ParsedYaml, node_id: &str, array_name: &str, to_field: &str, target: &str) -> String {
    let array_path = format!("nodes.{node_id}.{array_name}");
    let connection = YamlValue::Mapping(vec![(to_field.to_owned(), YamlValue::String(target.to_owned()))]);
    if doc.data.get_path(&array_path).is_some() {
        doc.append_to_sequence(&array_path, &connection)
    } else {
        doc.add_map_entry(&format!("nodes.{node_id}"), array_name, &YamlValue::Sequence(vec![connection]))
    }
}

/// Applies an add/delete/reorder to the sequence at `path` by rebuilding it
/// from scratch through `delete_entry`/`append_to_sequence` — there's no
/// single CST primitive for "insert at index", so the sequence is read into
/// memory, rearranged, and replayed back in its new order.
pub fn apply_array_item_edit(doc: &ParsedYaml, path: &str, edit: &ArrayItemEdit) -> String {
    let items: Vec<YamlValue> = doc.data.get_path(path).and_then(YamlValue::as_sequence).map(<[_]>::to_vec).unwrap_or_default();

    let new_items = match edit {
        ArrayItemEdit::Delete { index } => {
            let mut items = items;
            if *index < items.len() {
                items.remove(*index);
            }
            items
        }
        ArrayItemEdit::Add { index } => {
            let mut items = items;
            let insert_at = (*index).min(items.len());
            items.insert(insert_at, YamlValue::Mapping(Vec::new()));
            items
        }
        ArrayItemEdit::Reorder { from_index, to_index } => {
            let mut items = items;
            if *from_index < items.len() {
                let item = items.remove(*from_index);
                let insert_at = (*to_index).min(items.len());
                items.insert(insert_at, item);
            }
            items
        }
    };

    replace_sequence(doc, path, new_items)
}

fn replace_sequence(doc: &ParsedYaml, path: &str, new_items: Vec<YamlValue>) -> String {
    let mut text = doc.text.clone();
    let mut current = doc.clone();

    let len = current.data.get_path(path).and_then(YamlValue::as_sequence).map(<[_]>::len).unwrap_or(0);
    for index in (0..len).rev() {
        text = current.delete_entry(&format!("{path}.{index}"));
        current = ParsedYaml::parse(&text).unwrap_or(current);
    }
    for item in &new_items {
        text = current.append_to_sequence(path, item);
        current = ParsedYaml::parse(&text).unwrap_or(current);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> EdgeLinks {
        EdgeLinks {
            source_path: "nodes.*.transitions".into(),
            from_field: "to".into(),
            from_implicit: Some("_parent_key".into()),
            to_field: "to".into(),
            label_field: None,
            link_styles: Default::default(),
            label_template: None,
        }
    }

    #[test]
    fn is_valid_node_id_rejects_dots_and_empty() {
        assert!(is_valid_node_id("pending"));
        assert!(!is_valid_node_id(""));
        assert!(!is_valid_node_id("a.b"));
    }

    #[test]
    fn generate_duplicate_id_skips_taken_names() {
        let existing = vec!["start-copy".to_owned()];
        assert_eq!(generate_duplicate_id("start", &existing), "start-copy-2");
    }

    #[test]
    fn insert_default_node_adds_label_entry() {
        let doc = ParsedYaml::parse("nodes:\n  start:\n    label: Begin\n").expect("parse");
        let text = insert_default_node(&doc, "middle");
        assert!(text.contains("middle:\n    label: middle\n") || text.contains("middle: {label: middle}"));
    }

    #[test]
    fn rewrite_references_updates_colocated_transitions() {
        let text = "nodes:\n  start:\n    label: Begin\n    transitions:\n      - to: pending\n  pending:\n    label: Pending\n";
        let doc = ParsedYaml::parse(text).expect("parse");
        let rewritten = rewrite_references(&doc, "pending", "waiting", &links());
        assert!(rewritten.contains("to: waiting"));
        assert!(!rewritten.contains("to: pending"));
    }

    #[test]
    fn add_connection_creates_array_when_missing() {
        let doc = ParsedYaml::parse("nodes:\n  start:\n    label: Begin\n").expect("parse");
        let text = add_connection(&doc, "start", "transitions", "to", "pending");
        assert!(text.contains("to: pending"));
    }

    #[test]
    fn apply_array_item_edit_deletes_by_index() {
        let doc = ParsedYaml::parse("edges:\n  - {to: a}\n  - {to: b}\n").expect("parse");
        let edit = ArrayItemEdit::Delete { index: 0 };
        let text = apply_array_item_edit(&doc, "edges", &edit);
        assert!(!text.contains("to: a"));
        assert!(text.contains("to: b"));
    }
}
