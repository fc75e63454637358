use crate::model::{EdgeData, NodeData};

/// `type ∈ {initial, final}` emits nothing — those are handled entirely by
/// the engine's connector lines. Otherwise `<id> : <label>` (spec.md §4.7
/// step 8 State diagram).
pub fn render_node(node: &NodeData, sanitized_id: &str) -> Vec<String> {
    if node.node_type == "initial" || node.node_type == "final" {
        return Vec::new();
    }
    let label = node.fields.get("label").and_then(serde_json::Value::as_str).unwrap_or(sanitized_id);
    vec![format!("{sanitized_id} : {label}")]
}

/// `<from> --> <to>` with an optional ` : <event>[ [<guard>]]` suffix
/// (spec.md §4.7 step 9 State diagram).
pub fn render_edge(edge: &EdgeData, sanitized_from: &str, sanitized_to: &str) -> Vec<String> {
    let event = edge.fields.get("event").and_then(serde_json::Value::as_str);
    let guard = edge.fields.get("guard").and_then(serde_json::Value::as_str);

    let line = match (event, guard) {
        (Some(event), Some(guard)) => format!("{sanitized_from} --> {sanitized_to} : {event} [{guard}]"),
        (Some(event), None) => format!("{sanitized_from} --> {sanitized_to} : {event}"),
        (None, _) => format!("{sanitized_from} --> {sanitized_to}"),
    };
    vec![line]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Id;
    use std::collections::HashMap;

    #[test]
    fn render_node_skips_initial_and_final() {
        let node = NodeData { id: Id::new("init").expect("id"), shape: "rectangle".into(), node_type: "initial".into(), subtype: None, fields: HashMap::new() };
        assert!(render_node(&node, "init").is_empty());
    }

    #[test]
    fn render_node_emits_label_line() {
        let mut fields = HashMap::new();
        fields.insert("label".to_owned(), serde_json::json!("Pending"));
        let node = NodeData { id: Id::new("pending").expect("id"), shape: "rectangle".into(), node_type: "step".into(), subtype: None, fields };
        assert_eq!(render_node(&node, "pending"), vec!["pending : Pending".to_owned()]);
    }

    #[test]
    fn render_edge_with_event_and_guard() {
        let mut fields = HashMap::new();
        fields.insert("event".to_owned(), serde_json::json!("approve"));
        fields.insert("guard".to_owned(), serde_json::json!("isValid"));
        let edge = EdgeData { from: "pending".into(), to: "completed".into(), fields };
        assert_eq!(render_edge(&edge, "pending", "completed"), vec!["pending --> completed : approve [isValid]".to_owned()]);
    }
}
