use crate::model::{EdgeData, NodeData};

/// `<id> {` then one `<type> <name>[ <key>]` line per `fields.attributes[]`,
/// then `}` (spec.md §4.7 step 8 ER).
pub fn render_node(node: &NodeData, sanitized_id: &str) -> Vec<String> {
    let mut lines = vec![format!("{sanitized_id} {{")];
    if let Some(attributes) = node.fields.get("attributes").and_then(serde_json::Value::as_array) {
        for attribute in attributes {
            let attr_type = attribute.get("type").and_then(serde_json::Value::as_str).unwrap_or("string");
            let name = attribute.get("name").and_then(serde_json::Value::as_str).unwrap_or("");
            match attribute.get("key").and_then(serde_json::Value::as_str) {
                Some(key) => lines.push(format!("{attr_type} {name} {key}")),
                None => lines.push(format!("{attr_type} {name}")),
            }
        }
    }
    lines.push("}".to_owned());
    lines
}

/// Maps `fields.type` to a relation glyph (default `||--o{`) and emits
/// `<from> <rel> <to> : "<label>"` (spec.md §4.7 step 9 ER).
pub fn render_edge(edge: &EdgeData, sanitized_from: &str, sanitized_to: &str) -> Vec<String> {
    let relation_type = edge.fields.get("type").and_then(serde_json::Value::as_str).unwrap_or("one-to-many");
    let glyph = match relation_type {
        "one-to-one" => "||--||",
        "one-to-many" => "||--o{",
        "many-to-one" => "}o--||",
        "many-to-many" => "}o--o{",
        _ => "||--o{",
    };
    let label = edge.fields.get("label").and_then(serde_json::Value::as_str).unwrap_or("");
    vec![format!("{sanitized_from} {glyph} {sanitized_to} : \"{label}\"")]
}
