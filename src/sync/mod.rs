//! Maps cursor position in the YAML source to a tree-panel selection id and
//! back (spec.md §4.11 SourceSync). Tree ids follow exactly the scheme
//! [`crate::tree::TreeDataBuilder`] emits — `__meta__`, `__meta__.<field>`,
//! `__nodes__`, `<id>`, `<id>.<field>`, `<id>.<field>[<n>]`, `__edges__`,
//! `__edge_<n>` — so a tree click and a cursor move land on the same
//! namespace without either side needing to know about the other.

use crate::cst::{ParsedYaml, PathSegment};
use crate::model::GraphMapping;
use crate::node_editor::json_pointer_to_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorChangeKind {
    Keyboard,
    Mouse,
    /// A cursor move the editor made itself in response to a tree/diagram
    /// selection — source-synced back into a reveal, not a new selection.
    Programmatic,
}

/// Tracks the last tree id synced from the cursor, so a cursor that hasn't
/// actually left its enclosing value doesn't repeatedly re-select it.
#[derive(Debug, Default)]
pub struct SourceSync {
    last_synced_id: Option<String>,
}

impl SourceSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// A keyboard/mouse cursor move at `offset`; returns the tree id to
    /// select, or `None` if the kind is programmatic, the offset resolves
    /// to nothing mappable, or it's the same id already synced.
    pub fn on_cursor_change(
        &mut self,
        kind: CursorChangeKind,
        offset: usize,
        doc: &ParsedYaml,
        mapping: &GraphMapping,
    ) -> Option<String> {
        if kind == CursorChangeKind::Programmatic {
            return None;
        }
        let (segments, _node) = doc.find_node_at_offset(offset)?;
        let tree_id = path_segments_to_tree_id(&segments, mapping)?;
        if self.last_synced_id.as_deref() == Some(tree_id.as_str()) {
            return None;
        }
        self.last_synced_id = Some(tree_id.clone());
        Some(tree_id)
    }

    /// Resets the de-duplication state, e.g. after the document is swapped
    /// for an unrelated one.
    pub fn reset(&mut self) {
        self.last_synced_id = None;
    }

    /// The inverse direction: a tree/diagram selection id to the dot-path
    /// `ParsedYaml`'s edit functions expect.
    pub fn tree_id_to_dot_path(tree_id: &str, mapping: &GraphMapping) -> Option<String> {
        if tree_id == "__nodes__" || tree_id == "__edges__" {
            return None;
        }
        if tree_id == "__meta__" {
            return Some("meta".to_owned());
        }
        if let Some(field) = tree_id.strip_prefix("__meta__.") {
            return Some(format!("meta.{field}"));
        }
        if let Some(rest) = tree_id.strip_prefix("__edge_") {
            let index: usize = rest.parse().ok()?;
            let edges_path = mapping.edge_links.source_path.replace(".*.", ".");
            return Some(format!("{edges_path}.{index}"));
        }

        let (node_id, remainder) = tree_id.split_once('.').unwrap_or((tree_id, ""));
        let base = format!("{}.{node_id}", mapping.node_shapes.source_path);
        if remainder.is_empty() {
            Some(base)
        } else {
            Some(json_pointer_to_path(&base, remainder))
        }
    }
}

fn path_segments_to_tree_id(segments: &[PathSegment], mapping: &GraphMapping) -> Option<String> {
    let first_key = match segments.first()? {
        PathSegment::Key(key) => key.as_str(),
        PathSegment::Index(_) => return None,
    };

    if first_key == "meta" {
        return match segments.get(1) {
            None => Some("__meta__".to_owned()),
            Some(PathSegment::Key(field)) => Some(format!("__meta__.{field}")),
            Some(PathSegment::Index(_)) => Some("__meta__".to_owned()),
        };
    }

    let node_root = mapping.node_shapes.source_path.split('.').next().unwrap_or("nodes");
    if first_key == node_root {
        let node_id = match segments.get(1) {
            Some(PathSegment::Key(id)) => id.clone(),
            _ => return Some("__nodes__".to_owned()),
        };
        if segments.len() == 2 {
            return Some(node_id);
        }
        return Some(format!("{node_id}{}", render_field_suffix(&segments[2..])));
    }

    let edges_root = mapping.edge_links.source_path.split('.').next().unwrap_or("edges");
    if first_key == edges_root {
        return match segments.get(1) {
            Some(PathSegment::Index(index)) => Some(format!("__edge_{index}")),
            _ => Some("__edges__".to_owned()),
        };
    }

    None
}

fn render_field_suffix(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                out.push('.');
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeLinks, MapHeader, NodeShapes};

    fn mapping() -> GraphMapping {
        GraphMapping {
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
        }
    }

    #[test]
    fn cursor_on_node_label_maps_to_field_tree_id() {
        let doc = ParsedYaml::parse("nodes:\n  start:\n    label: Begin\n").expect("parse");
        let offset = doc.text.find("Begin").expect("offset");
        let mut sync = SourceSync::new();
        let tree_id = sync.on_cursor_change(CursorChangeKind::Mouse, offset, &doc, &mapping());
        assert_eq!(tree_id.as_deref(), Some("start.label"));
    }

    #[test]
    fn programmatic_cursor_change_is_ignored() {
        let doc = ParsedYaml::parse("nodes:\n  start:\n    label: Begin\n").expect("parse");
        let offset = doc.text.find("Begin").expect("offset");
        let mut sync = SourceSync::new();
        assert_eq!(sync.on_cursor_change(CursorChangeKind::Programmatic, offset, &doc, &mapping()), None);
    }

    #[test]
    fn repeated_cursor_change_in_same_value_does_not_resync() {
        let doc = ParsedYaml::parse("nodes:\n  start:\n    label: Begin\n").expect("parse");
        let offset = doc.text.find("Begin").expect("offset");
        let mut sync = SourceSync::new();
        assert!(sync.on_cursor_change(CursorChangeKind::Keyboard, offset, &doc, &mapping()).is_some());
        assert_eq!(sync.on_cursor_change(CursorChangeKind::Keyboard, offset, &doc, &mapping()), None);
    }

    #[test]
    fn tree_id_to_dot_path_round_trips_node_field() {
        assert_eq!(SourceSync::tree_id_to_dot_path("start.label", &mapping()), Some("nodes.start.label".to_owned()));
        assert_eq!(SourceSync::tree_id_to_dot_path("__meta__.graph-version", &mapping()), Some("meta.graph-version".to_owned()));
        assert_eq!(SourceSync::tree_id_to_dot_path("__edge_1", &mapping()), Some("edges.1".to_owned()));
    }
}
