//! Per-family node/edge rendering (spec.md §4.7 steps 8-9). Dispatch is a
//! tagged match on `mapping.map.mermaidType` rather than a node/edge trait
//! object hierarchy — a new family is one more match arm, matching the
//! teacher's `render::diagram::render_diagram_unicode`'s match on
//! `DiagramAst` variant rather than dynamic dispatch.

mod er;
mod flowchart;
mod state;

use crate::model::{EdgeData, GraphMapping, NodeData};

/// The three diagram families this engine knows how to emit (spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidFamily {
    Flowchart,
    StateDiagram,
    Er,
}

impl MermaidFamily {
    pub fn from_mermaid_type(mermaid_type: &str) -> Self {
        match mermaid_type {
            "stateDiagram-v2" => Self::StateDiagram,
            "erDiagram" => Self::Er,
            _ => Self::Flowchart,
        }
    }
}

/// Renders one node's default (non-transformed) body lines.
pub fn render_node(family: MermaidFamily, node: &NodeData, sanitized_id: &str, mapping: &GraphMapping) -> Vec<String> {
    match family {
        MermaidFamily::Flowchart => flowchart::render_node(node, sanitized_id, mapping),
        MermaidFamily::StateDiagram => state::render_node(node, sanitized_id),
        MermaidFamily::Er => er::render_node(node, sanitized_id),
    }
}

/// Renders one edge's default (non-transformed) body lines.
pub fn render_edge(family: MermaidFamily, edge: &EdgeData, sanitized_from: &str, sanitized_to: &str, mapping: &GraphMapping) -> Vec<String> {
    match family {
        MermaidFamily::Flowchart => flowchart::render_edge(edge, sanitized_from, sanitized_to, mapping),
        MermaidFamily::StateDiagram => state::render_edge(edge, sanitized_from, sanitized_to),
        MermaidFamily::Er => er::render_edge(edge, sanitized_from, sanitized_to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mermaid_type_maps_known_families() {
        assert_eq!(MermaidFamily::from_mermaid_type("stateDiagram-v2"), MermaidFamily::StateDiagram);
        assert_eq!(MermaidFamily::from_mermaid_type("erDiagram"), MermaidFamily::Er);
        assert_eq!(MermaidFamily::from_mermaid_type("flowchart"), MermaidFamily::Flowchart);
        assert_eq!(MermaidFamily::from_mermaid_type("graph"), MermaidFamily::Flowchart);
    }
}
