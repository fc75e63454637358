//! Produces the field-schema + current-value bundle shown when a node is
//! selected (spec.md §4.9 NodeEditorController).

use std::collections::BTreeMap;

use crate::model::{FieldSchema, GraphType, GraphTypeId, NodeData};
use crate::protocol::{FieldSchemaWire, NodeDataWire, OutboundMessage};
use crate::schema::SchemaResolver;

/// Caches the resolved `FieldSchema` tree per `(graphTypeId, version)` so
/// repeated node selections within the same graph type don't re-walk the
/// schema (spec.md §4.12). Cleared wholesale on registry reload.
#[derive(Debug, Default)]
pub struct NodeEditorController {
    cache: BTreeMap<(GraphTypeId, u32), Vec<FieldSchema>>,
}

impl NodeEditorController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Builds the `showNode` outbound message for a selected node.
    pub fn show_node(&mut self, node: &NodeData, graph_type: &GraphType) -> OutboundMessage {
        let schema = self.schema_for(graph_type);
        OutboundMessage::ShowNode {
            node_id: node.id.to_string(),
            node_data: NodeDataWire::from(node),
            schema: schema.iter().map(FieldSchemaWire::from).collect(),
        }
    }

    fn schema_for(&mut self, graph_type: &GraphType) -> Vec<FieldSchema> {
        let key = graph_type.key();
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let root = graph_type.schema.as_ref();
        let node_schema =
            SchemaResolver::extract_node_sub_schema(root, &graph_type.mapping.node_shapes.source_path).unwrap_or(serde_json::json!({}));
        let required: Vec<String> = node_schema
            .get("required")
            .and_then(serde_json::Value::as_array)
            .map(|items| items.iter().filter_map(serde_json::Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default();
        let fields = SchemaResolver::build_field_schemas(root, &node_schema, "/fields", &required);

        self.cache.insert(key, fields.clone());
        fields
    }
}

/// Parses a widget field path like `tags[0].name` into the dot-path segments
/// CST edit functions expect, prefixed by `base_path` (spec.md §4.9). A bare
/// segment name passes through untouched; each trailing `[n]` becomes its own
/// numeric dot-path segment.
pub fn json_pointer_to_path(base_path: &str, pointer: &str) -> String {
    let mut out = base_path.to_owned();
    for raw_segment in pointer.split('.').filter(|s| !s.is_empty()) {
        let (name, indices) = split_bracket_indices(raw_segment);
        if !name.is_empty() {
            out.push('.');
            out.push_str(name);
        }
        for index in indices {
            out.push('.');
            out.push_str(&index.to_string());
        }
    }
    out
}

fn split_bracket_indices(segment: &str) -> (&str, Vec<usize>) {
    let name_end = segment.find('[').unwrap_or(segment.len());
    let name = &segment[..name_end];
    let mut rest = &segment[name_end..];
    let mut indices = Vec::new();
    while let Some(close) = rest.find(']') {
        if let Ok(index) = rest[1..close].parse::<usize>() {
            indices.push(index);
        }
        rest = &rest[close + 1..];
    }
    (name, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeLinks, GraphMapping, Id, MapHeader, NodeShapes};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn graph_type() -> GraphType {
        let schema = serde_json::json!({
            "properties": {
                "nodes": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "properties": { "label": { "type": "string" }, "tags": { "type": "array", "items": { "type": "string" } } },
                        "required": ["label"]
                    }
                }
            }
        });
        let mapping = GraphMapping {
            map: MapHeader { id: "flow".into(), version: 1, mermaid_type: "flowchart".into(), direction_field: None, default_direction: None },
            node_shapes: NodeShapes {
                source_path: "nodes".into(),
                id_field: "_key".into(),
                label_field: "label".into(),
                shape_field: "shape".into(),
                default_shapes: None,
                shapes: Default::default(),
                initial_connector: None,
                final_connector: None,
            },
            edge_links: EdgeLinks {
                source_path: "edges".into(),
                from_field: "from".into(),
                from_implicit: None,
                to_field: "to".into(),
                label_field: None,
                link_styles: Default::default(),
                label_template: None,
            },
            style_rules: None,
            transforms: None,
            annotations: None,
            custom_renderer: None,
        };
        GraphType {
            id: Id::new("flow").expect("id"),
            version: 1,
            file_patterns: vec!["*.flow.yaml".into()],
            schema: Arc::new(schema),
            mapping: Arc::new(mapping),
            style_sheet: None,
            source_dir: PathBuf::from("/tmp"),
        }
    }

    #[test]
    fn show_node_resolves_schema_from_node_sub_schema() {
        let mut controller = NodeEditorController::new();
        let gt = graph_type();
        let mut fields = HashMap::new();
        fields.insert("label".to_owned(), serde_json::json!("Begin"));
        let node = NodeData { id: Id::new("start").expect("id"), shape: "rectangle".into(), node_type: "start".into(), subtype: None, fields };

        match controller.show_node(&node, &gt) {
            OutboundMessage::ShowNode { node_id, schema, .. } => {
                assert_eq!(node_id, "start");
                assert!(schema.iter().any(|f| f.label == "Label"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn schema_cache_reused_across_calls() {
        let mut controller = NodeEditorController::new();
        let gt = graph_type();
        let fields = HashMap::new();
        let node = NodeData { id: Id::new("a").expect("id"), shape: "rectangle".into(), node_type: "default".into(), subtype: None, fields };

        controller.show_node(&node, &gt);
        assert_eq!(controller.cache.len(), 1);
        controller.show_node(&node, &gt);
        assert_eq!(controller.cache.len(), 1);

        controller.clear_cache();
        assert!(controller.cache.is_empty());
    }

    #[test]
    fn json_pointer_to_path_splits_array_index() {
        assert_eq!(json_pointer_to_path("nodes.start", "tags[0]"), "nodes.start.tags.0");
        assert_eq!(json_pointer_to_path("nodes.start", "label"), "nodes.start.label");
        assert_eq!(json_pointer_to_path("nodes.start", "attributes[1].name"), "nodes.start.attributes.1.name");
    }
}
