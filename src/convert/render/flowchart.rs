use crate::convert::extract::resolve_field_path;
use crate::convert::shapes::resolve_template;
use crate::model::{EdgeData, GraphMapping, NodeData};

/// `<id><shape-template>` with `{label}`/`{id}` substituted (spec.md §4.7
/// step 8 Flowchart).
pub fn render_node(node: &NodeData, sanitized_id: &str, mapping: &GraphMapping) -> Vec<String> {
    let label = node
        .fields
        .get(&mapping.node_shapes.label_field)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| sanitized_id.to_owned());

    let template = resolve_template(&mapping.node_shapes.shapes, &node.shape);
    let body = template.replace("{label}", &label).replace("{id}", sanitized_id);
    vec![format!("{sanitized_id}{body}")]
}

/// Selects `linkStyles[fields.style ?? "default"]` (default arrow `-->`). A
/// present label uses the inline-label arrows (`-.->`/`==>`) as-is; any
/// other arrow style falls back to the plain `-->` arrow with the label
/// attached (spec.md §4.7 step 9 Flowchart).
pub fn render_edge(edge: &EdgeData, sanitized_from: &str, sanitized_to: &str, mapping: &GraphMapping) -> Vec<String> {
    let style = resolve_field_path(&edge.fields, "style").and_then(serde_json::Value::as_str).unwrap_or("default");
    let arrow = mapping.edge_links.link_styles.get(style).map(String::as_str).unwrap_or("-->");
    let label = edge
        .fields
        .get(mapping.edge_links.label_field.as_deref().unwrap_or("label"))
        .and_then(serde_json::Value::as_str);

    let line = match label {
        Some(label) if arrow == "-.->" || arrow == "==>" => format!("{sanitized_from} {arrow}|{label}| {sanitized_to}"),
        Some(label) => format!("{sanitized_from} -->|{label}| {sanitized_to}"),
        None => format!("{sanitized_from} {arrow} {sanitized_to}"),
    };
    vec![line]
}
