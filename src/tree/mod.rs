//! Builds a hierarchical tree model from parsed YAML for a side panel
//! (spec.md §4.8 TreeDataBuilder). Tree node ids follow exactly the scheme
//! [`crate::sync`] maps back to dot-paths, so a click in the tree and a
//! cursor move in the text land on the same id space.

use serde::{Deserialize, Serialize};

use crate::cst::YamlValue;
use crate::model::{GraphMapping, NodeData};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), icon: None, children: Vec::new() }
    }

    fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

pub struct TreeDataBuilder;

impl TreeDataBuilder {
    /// Builds the three top-level groups (`__meta__`, `__nodes__`,
    /// `__edges__`) from a parsed document. `nodes` is the already-extracted
    /// node list (built by the conversion engine) so ordering matches
    /// insertion order exactly rather than re-deriving it here.
    pub fn build(data: &YamlValue, mapping: &GraphMapping, nodes: &[NodeData]) -> Vec<TreeNode> {
        let mut groups = Vec::with_capacity(3);

        if let Some(meta) = data.get("meta") {
            groups.push(build_meta_group(meta));
        }

        groups.push(build_nodes_group(nodes));

        if let Some(edges) = data.get_path(&mapping.edge_links.source_path.replace(".*.", ".")) {
            groups.push(build_edges_group(edges, mapping));
        } else {
            groups.push(TreeNode::leaf("__edges__", "Edges").with_icon("edges"));
        }

        groups
    }
}

fn build_meta_group(meta: &YamlValue) -> TreeNode {
    let children = meta
        .as_mapping()
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| TreeNode::leaf(format!("__meta__.{key}"), format!("{key}: {}", value.display_scalar())))
                .collect()
        })
        .unwrap_or_default();
    TreeNode::leaf("__meta__", "Meta").with_icon("meta").with_children(children)
}

fn build_nodes_group(nodes: &[NodeData]) -> TreeNode {
    let children = nodes.iter().map(build_node_entry).collect();
    TreeNode::leaf("__nodes__", "Nodes").with_icon("nodes").with_children(children)
}

fn build_node_entry(node: &NodeData) -> TreeNode {
    let id = node.id.to_string();
    let label = node
        .fields
        .get("label")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| id.clone());

    let mut children = Vec::new();
    let mut field_keys: Vec<&String> = node.fields.keys().collect();
    field_keys.sort();
    for key in field_keys {
        if key == "label" {
            continue;
        }
        let value = &node.fields[key];
        if let Some(child) = build_non_trivial_field(&id, key, value) {
            children.push(child);
        }
    }

    TreeNode::leaf(id, label).with_icon(node.node_type.clone()).with_children(children)
}

fn build_non_trivial_field(node_id: &str, key: &str, value: &serde_json::Value) -> Option<TreeNode> {
    match value {
        serde_json::Value::Array(items) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(index, item)| TreeNode::leaf(format!("{node_id}.{key}[{index}]"), json_display(item)))
                .collect();
            Some(TreeNode::leaf(format!("{node_id}.{key}"), key.to_owned()).with_children(children))
        }
        serde_json::Value::Object(fields) => {
            let children = fields
                .iter()
                .map(|(nested_key, nested_value)| {
                    TreeNode::leaf(format!("{node_id}.{key}.{nested_key}"), format!("{nested_key}: {}", json_display(nested_value)))
                })
                .collect();
            Some(TreeNode::leaf(format!("{node_id}.{key}"), key.to_owned()).with_children(children))
        }
        _ => None,
    }
}

fn build_edges_group(edges: &YamlValue, mapping: &GraphMapping) -> TreeNode {
    let Some(items) = edges.as_sequence() else {
        return TreeNode::leaf("__edges__", "Edges").with_icon("edges");
    };
    let children = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let from = item.get(&mapping.edge_links.from_field).map(YamlValue::display_scalar).unwrap_or_default();
            let to = item.get(&mapping.edge_links.to_field).map(YamlValue::display_scalar).unwrap_or_default();
            TreeNode::leaf(format!("__edge_{index}"), format!("{from} -> {to}"))
        })
        .collect();
    TreeNode::leaf("__edges__", "Edges").with_icon("edges").with_children(children)
}

fn json_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
