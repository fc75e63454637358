use std::collections::HashMap;

use serde_json::Value as JsonValue;

use super::ids::NodeId;

/// One extracted graph node (spec.md §3 NodeData). `type` is the semantic
/// classification validated against the domain schema; `shape` is purely
/// visual and resolved by `NodeShapes` precedence before this struct exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: NodeId,
    pub shape: String,
    pub node_type: String,
    pub subtype: Option<String>,
    pub fields: HashMap<String, JsonValue>,
}

impl NodeData {
    /// Resolves the node's visual shape: explicit `shapeField` value, else
    /// `defaultShapes[type]`, else `"rectangle"` (spec.md §3 NodeData).
    pub fn resolve_shape(
        explicit_shape: Option<&str>,
        node_type: &str,
        default_shapes: Option<&HashMap<String, String>>,
    ) -> String {
        if let Some(shape) = explicit_shape {
            return shape.to_owned();
        }
        if let Some(shape) = default_shapes.and_then(|map| map.get(node_type)) {
            return shape.clone();
        }
        "rectangle".to_owned()
    }
}
