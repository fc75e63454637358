//! Extracts [`NodeData`]/[`EdgeData`] out of parsed YAML via a mapping's
//! `nodeShapes`/`edgeLinks` rules (spec.md §4.7 steps 3-4).

use std::collections::HashMap;

use crate::cst::{ParsedYaml, YamlValue};
use crate::model::{EdgeData, EdgeLinks, Id, NodeData, NodeShapes, SourceRange};

pub struct ExtractedNode {
    pub node: NodeData,
    pub range: Option<SourceRange>,
}

/// Extracts every node from `doc.data` at `shapes.sourcePath`, in YAML
/// insertion order (spec.md §3 invariant 3). Entries that don't parse as a
/// valid node id are skipped rather than aborting the whole extraction —
/// one malformed node must not blank out the rest of the diagram.
pub fn extract_nodes(doc: &ParsedYaml, shapes: &NodeShapes) -> Vec<ExtractedNode> {
    let Some(container) = doc.data.get_path(&shapes.source_path) else {
        return Vec::new();
    };
    let Some(entries) = container.as_mapping() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(key, value)| {
            let id_str = if shapes.id_field == "_key" {
                key.clone()
            } else {
                value.get(&shapes.id_field)?.as_str()?.to_owned()
            };
            let id = Id::new(id_str).ok()?;

            let fields = json_fields(value);
            let node_type = fields.get("type").and_then(serde_json::Value::as_str).unwrap_or("default").to_owned();
            let explicit_shape = value.get(&shapes.shape_field).and_then(YamlValue::as_str);
            let shape = NodeData::resolve_shape(explicit_shape, &node_type, shapes.default_shapes.as_ref());
            let subtype = fields.get("subtype").and_then(serde_json::Value::as_str).map(str::to_owned);

            let range = doc.get_map_entry_range(&format!("{}.{key}", shapes.source_path));

            Some(ExtractedNode {
                node: NodeData { id, shape, node_type, subtype, fields },
                range,
            })
        })
        .collect()
}

pub struct ExtractedEdge {
    pub edge: EdgeData,
    pub range: Option<SourceRange>,
}

/// Extracts edges per `links.sourcePath`: either a top-level array, or a
/// per-node co-located array (`<nodesPath>.*.<arrayName>`), in which case
/// `from` defaults to the owning node's key when `fromImplicit == "_parent_key"`.
pub fn extract_edges(doc: &ParsedYaml, links: &EdgeLinks) -> Vec<ExtractedEdge> {
    if links.is_colocated() {
        extract_colocated_edges(doc, links)
    } else {
        extract_toplevel_edges(doc, links)
    }
}

fn extract_colocated_edges(doc: &ParsedYaml, links: &EdgeLinks) -> Vec<ExtractedEdge> {
    let Some((nodes_path, array_name)) = links.source_path.split_once(".*.") else {
        return Vec::new();
    };
    let Some(container) = doc.data.get_path(nodes_path) else {
        return Vec::new();
    };
    let Some(entries) = container.as_mapping() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (key, node_value) in entries {
        let Some(items) = node_value.get(array_name).and_then(YamlValue::as_sequence) else {
            continue;
        };
        for (index, item) in items.iter().enumerate() {
            let from = if links.from_implicit.as_deref() == Some("_parent_key") {
                key.clone()
            } else {
                item.get(&links.from_field).map(YamlValue::display_scalar).unwrap_or_default()
            };
            let to = item.get(&links.to_field).map(YamlValue::display_scalar).unwrap_or_default();
            let fields = json_fields(item);
            let path = format!("{nodes_path}.{key}.{array_name}.{index}");
            let range = doc.get_source_range(&path);
            out.push(ExtractedEdge { edge: EdgeData { from, to, fields }, range });
        }
    }
    out
}

fn extract_toplevel_edges(doc: &ParsedYaml, links: &EdgeLinks) -> Vec<ExtractedEdge> {
    let Some(items) = doc.data.get_path(&links.source_path).and_then(YamlValue::as_sequence) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let from = item.get(&links.from_field).map(YamlValue::display_scalar).unwrap_or_default();
            let to = item.get(&links.to_field).map(YamlValue::display_scalar).unwrap_or_default();
            let fields = json_fields(item);
            let path = format!("{}.{index}", links.source_path);
            let range = doc.get_source_range(&path);
            ExtractedEdge { edge: EdgeData { from, to, fields }, range }
        })
        .collect()
}

fn json_fields(value: &YamlValue) -> HashMap<String, serde_json::Value> {
    value
        .as_mapping()
        .map(|entries| entries.iter().map(|(k, v)| (k.clone(), serde_json::Value::from(v))).collect())
        .unwrap_or_default()
}

/// Resolves a dot-path into a node/edge's field map, navigating nested JSON
/// objects (spec.md §4.7 step 10: style-rule fields may be nested).
pub fn resolve_field_path<'a>(fields: &'a HashMap<String, serde_json::Value>, path: &str) -> Option<&'a serde_json::Value> {
    let mut parts = path.split('.');
    let mut current = fields.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}
