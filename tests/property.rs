//! Property tests for the quantified invariants in spec.md §8, grounded in
//! `flowscope-core`'s `tests/property.rs` (`proptest!` over randomly
//! generated identifiers/strings rather than hand-picked fixtures).

use std::path::PathBuf;
use std::sync::Arc;

use graphloom::convert::ConversionEngine;
use graphloom::cst::{ParsedYaml, YamlValue};
use graphloom::model::{EdgeLinks, GraphMapping, GraphType, Id, MapHeader, NodeShapes};
use proptest::prelude::*;

fn flowchart_graph_type() -> GraphType {
    let mapping = GraphMapping {
        map: MapHeader { id: "flow".into(), version: 1, mermaid_type: "flowchart".into(), direction_field: None, default_direction: Some("TD".into()) },
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
        schema: Arc::new(serde_json::json!({})),
        mapping: Arc::new(mapping),
        style_sheet: None,
        source_dir: PathBuf::from("/tmp"),
    }
}

proptest! {
    // spec.md §8 invariant 5 (generalized to §3 invariant 5): any hyphenated
    // YAML node key is sanitized in the rendered Mermaid text for flowchart
    // families, while `nodeMap` keeps the original, unsanitized key.
    #[test]
    fn hyphenated_ids_are_sanitized_in_flowchart_output_but_not_in_node_map(
        base in "[a-z][a-z0-9]{0,6}",
        suffix in "[a-z0-9]{1,6}",
    ) {
        let id = format!("{base}-{suffix}");
        let text = format!("meta:\n  graph-version: 1\nnodes:\n  {id}:\n    label: L\n");
        let graph_type = flowchart_graph_type();
        let engine = ConversionEngine::new();

        let result = engine.convert(&text, &graph_type);

        prop_assert!(!result.mermaid_source.contains(&id));
        prop_assert!(result.mermaid_source.contains(&id.replace('-', "_")));
        prop_assert!(result.node_map.contains_key(&Id::new(id.as_str()).expect("valid id")));
    }

    // spec.md §8 invariant 3: editing one node's `label` never disturbs a
    // sibling's leading comment or its own value, for any label text that
    // keeps the fixture a valid YAML scalar.
    #[test]
    fn edit_value_preserves_untouched_sibling_comment(label in "[a-zA-Z]{1,20}") {
        let text = format!(
            "meta:\n  graph-version: 1\nnodes:\n  # keep me\n  start:\n    label: Begin\n    type: start\n  other:\n    label: {label}\n"
        );
        let doc = ParsedYaml::parse(&text).expect("fixture parses");
        let edited = doc.edit_value("start.label", &YamlValue::String("Changed".into()));

        prop_assert!(edited.contains("# keep me"));
        prop_assert!(edited.contains("Changed"));
        prop_assert!(edited.contains(label.trim()));
    }
}
