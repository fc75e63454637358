//! Turns parsed YAML into Mermaid source plus a source map (spec.md §4.7
//! ConversionEngine) — the heart of the crate. `convert` never returns a
//! `Result`: every failure mode is folded into `ConversionResult.errors` or
//! handled with a documented fallback, matching spec.md §7's propagation
//! policy ("the engine never throws out of `convert()`").

pub mod callbacks;
pub(crate) mod extract;
mod header;
mod render;
mod sanitize;
pub mod shapes;

use std::collections::HashMap;

use crate::cst::{ParsedYaml, YamlParseError};
use crate::error::{self, MissingGraphVersionError};
use crate::model::{ConversionResult, GraphType, TransformScope, ValidationError};
use crate::schema::SchemaValidator;
use crate::transform::{self, TransformContext, TransformRuntime};

pub use callbacks::{ConversionCallbacks, NullCallbacks};
pub use render::MermaidFamily;

/// The main entry point, reused by both `convert` and `convert_with_prepare`.
/// Owns its own [`SchemaValidator`]/[`TransformRuntime`] instances rather
/// than taking them as parameters — they're cheap to construct per call and
/// the only state either carries is an internal cache keyed by schema
/// identity (spec.md §5: "compiled validators... shared immutable caches").
pub struct ConversionEngine {
    validator: SchemaValidator,
    transforms: TransformRuntime,
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionEngine {
    pub fn new() -> Self {
        Self { validator: SchemaValidator::new(), transforms: TransformRuntime::new() }
    }

    /// Synchronous entry point used when no host callbacks are registered.
    pub fn convert(&self, text: &str, graph_type: &GraphType) -> ConversionResult {
        self.convert_with_callbacks(text, graph_type, &NullCallbacks)
    }

    /// Awaits `callbacks.prepare()` before parsing (spec.md §5 suspension
    /// point ordering), then runs the same synchronous pipeline.
    pub async fn convert_with_prepare(
        &self,
        text: &str,
        graph_type: &GraphType,
        callbacks: &dyn ConversionCallbacks,
    ) -> ConversionResult {
        callbacks.prepare().await;
        self.convert_with_callbacks(text, graph_type, callbacks)
    }

    fn convert_with_callbacks(&self, text: &str, graph_type: &GraphType, callbacks: &dyn ConversionCallbacks) -> ConversionResult {
        let doc = match ParsedYaml::parse(text) {
            Ok(doc) => doc,
            Err(err) => return parse_error_result(&err),
        };

        if let Err(missing) = error::check_graph_version(&doc.data) {
            return missing_graph_version_result(&missing);
        }

        let mapping = graph_type.mapping.as_ref();
        let errors = self.validator.validate(&graph_type.schema, &serde_json::Value::from(&doc.data));

        let extracted_nodes = extract::extract_nodes(&doc, &mapping.node_shapes);
        let extracted_edges = extract::extract_edges(&doc, &mapping.edge_links);

        let family = MermaidFamily::from_mermaid_type(&mapping.map.mermaid_type);
        callbacks.set_mermaid_type(&mapping.map.mermaid_type);

        let mut node_map = HashMap::new();
        let mut edge_map = HashMap::new();
        let mut body_lines = Vec::new();
        let all_ids: Vec<String> = extracted_nodes.iter().map(|n| n.node.id.to_string()).collect();

        if let Some(template) = &mapping.node_shapes.initial_connector {
            if let Some(initial) = extracted_nodes.iter().find(|n| n.node.node_type == "initial") {
                let sanitized = sanitize::sanitize_id(&mapping.map.mermaid_type, initial.node.id.as_str());
                body_lines.push(template.replace("{id}", &sanitized));
            }
        }

        let all_node_fields: Vec<serde_json::Value> =
            extracted_nodes.iter().map(|n| serde_json::Value::Object(n.node.fields.clone().into_iter().collect())).collect();
        let all_edge_fields: Vec<serde_json::Value> =
            extracted_edges.iter().map(|e| serde_json::Value::Object(e.edge.fields.clone().into_iter().collect())).collect();

        for extracted in &extracted_nodes {
            let node = &extracted.node;
            let sanitized_id = sanitize::sanitize_id(&mapping.map.mermaid_type, node.id.as_str());
            let default_lines = render::render_node(family, node, &sanitized_id, mapping);
            let fields_json = serde_json::Value::Object(node.fields.clone().into_iter().collect());
            let lines = transform::apply_first_match(
                &self.transforms,
                mapping.transforms.iter().flatten(),
                TransformScope::Node,
                &fields_json,
                &node.fields,
                TransformContext {
                    all_nodes: all_node_fields.clone(),
                    all_edges: all_edge_fields.clone(),
                    mapping_id: mapping.map.id.clone(),
                    output: default_lines.clone(),
                },
            )
            .unwrap_or(default_lines);

            let extra = callbacks.on_node_emit(node.id.as_str(), node, &lines);
            body_lines.extend(lines);
            body_lines.extend(extra);

            if let Some(range) = extracted.range {
                node_map.insert(node.id.clone(), range);
            }
        }

        for (index, extracted) in extracted_edges.iter().enumerate() {
            let edge = &extracted.edge;
            let sanitized_from = sanitize::sanitize_id(&mapping.map.mermaid_type, &edge.from);
            let sanitized_to = sanitize::sanitize_id(&mapping.map.mermaid_type, &edge.to);
            let default_lines = render::render_edge(family, edge, &sanitized_from, &sanitized_to, mapping);
            let fields_json = serde_json::Value::Object(edge.fields.clone().into_iter().collect());
            let lines = transform::apply_first_match(
                &self.transforms,
                mapping.transforms.iter().flatten(),
                TransformScope::Edge,
                &fields_json,
                &edge.fields,
                TransformContext {
                    all_nodes: all_node_fields.clone(),
                    all_edges: all_edge_fields.clone(),
                    mapping_id: mapping.map.id.clone(),
                    output: default_lines.clone(),
                },
            )
            .unwrap_or(default_lines);

            let extra = callbacks.on_edge_emit(edge, &lines);
            body_lines.extend(lines);
            body_lines.extend(extra);

            if let Some(range) = extracted.range {
                edge_map.insert(index, range);
            }
        }

        if let Some(template) = &mapping.node_shapes.final_connector {
            for extracted in extracted_nodes.iter().filter(|n| n.node.node_type == "final") {
                let sanitized = sanitize::sanitize_id(&mapping.map.mermaid_type, extracted.node.id.as_str());
                body_lines.push(template.replace("{id}", &sanitized));
            }
        }

        if let Some(style_rules) = &mapping.style_rules {
            for extracted in &extracted_nodes {
                let Some(value) = extract::resolve_field_path(&extracted.node.fields, &style_rules.field) else {
                    continue;
                };
                let Some(value_str) = value.as_str() else {
                    continue;
                };
                let Some(rule) = style_rules.rules.get(value_str) else {
                    continue;
                };
                let sanitized_id = sanitize::sanitize_id(&mapping.map.mermaid_type, extracted.node.id.as_str());
                body_lines.push(style_line(&sanitized_id, rule));
            }
        }

        let extra = callbacks.on_complete(&all_ids, &body_lines);
        body_lines.extend(extra);

        let header_line = header::header_line(&mapping.map, &doc.data);
        let mermaid_source = render_source(&header_line, &body_lines);

        ConversionResult { mermaid_source, errors, node_map, edge_map }
    }
}

fn style_line(sanitized_id: &str, rule: &crate::model::StyleRule) -> String {
    let mut parts = Vec::new();
    if let Some(fill) = &rule.fill {
        parts.push(format!("fill:{fill}"));
    }
    if let Some(stroke) = &rule.stroke {
        parts.push(format!("stroke:{stroke}"));
    }
    if let Some(color) = &rule.color {
        parts.push(format!("color:{color}"));
    }
    format!("style {sanitized_id} {}", parts.join(","))
}

fn render_source(header_line: &str, body_lines: &[String]) -> String {
    let mut out = String::from(header_line);
    for line in body_lines {
        out.push('\n');
        out.push_str("    ");
        out.push_str(line);
    }
    out
}

fn parse_error_result(err: &YamlParseError) -> ConversionResult {
    ConversionResult {
        mermaid_source: String::new(),
        errors: vec![ValidationError::error("/", err.to_string())],
        node_map: HashMap::new(),
        edge_map: HashMap::new(),
    }
}

fn missing_graph_version_result(err: &MissingGraphVersionError) -> ConversionResult {
    ConversionResult {
        mermaid_source: String::new(),
        errors: vec![ValidationError::error("/meta/graph-version", err.to_string())],
        node_map: HashMap::new(),
        edge_map: HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeLinks, GraphMapping, Id, MapHeader, NodeShapes, StyleRule, StyleRules};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn graph_type(mapping: GraphMapping, schema: serde_json::Value) -> GraphType {
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

    fn flowchart_mapping() -> GraphMapping {
        let mut shapes = HashMap::new();
        shapes.insert("stadium".to_owned(), r#"(["{label}"])"#.to_owned());
        shapes.insert("decision".to_owned(), r#"{{"{label}"}}"#.to_owned());
        shapes.insert("subroutine".to_owned(), r#"[["{label}"]]"#.to_owned());

        let mut rules = HashMap::new();
        rules.insert("active".to_owned(), StyleRule { fill: Some("#d4edda".into()), stroke: Some("#000".into()), color: Some("#000".into()) });

        GraphMapping {
            map: MapHeader { id: "flow".into(), version: 1, mermaid_type: "flowchart".into(), direction_field: None, default_direction: Some("TD".into()) },
            node_shapes: NodeShapes {
                source_path: "nodes".into(),
                id_field: "_key".into(),
                label_field: "label".into(),
                shape_field: "shape".into(),
                default_shapes: Some(HashMap::from([
                    ("start".to_owned(), "stadium".to_owned()),
                    ("decision".to_owned(), "decision".to_owned()),
                    ("subroutine".to_owned(), "subroutine".to_owned()),
                ])),
                shapes,
                initial_connector: None,
                final_connector: None,
            },
            edge_links: EdgeLinks {
                source_path: "edges".into(),
                from_field: "from".into(),
                from_implicit: None,
                to_field: "to".into(),
                label_field: Some("label".into()),
                link_styles: HashMap::new(),
                label_template: None,
            },
            style_rules: Some(StyleRules { field: "status".into(), rules }),
            transforms: None,
            annotations: None,
            custom_renderer: None,
        }
    }

    #[test]
    fn scenario_s1_flowchart_with_styles() {
        let text = "meta:\n  graph-version: 1\nnodes:\n  start: {type: start, label: Begin}\n  test:  {type: decision, label: \"Tests Pass?\", status: active}\n  deploy: {type: subroutine, label: \"Deploy to Staging\"}\n";
        let engine = ConversionEngine::new();
        let graph_type = graph_type(flowchart_mapping(), serde_json::json!({}));
        let result = engine.convert(text, &graph_type);

        assert!(result.mermaid_source.starts_with("flowchart TD"));
        assert!(result.mermaid_source.contains(r#"start(["Begin"])"#));
        assert!(result.mermaid_source.contains(r#"test{"Tests Pass?"}"#));
        assert!(result.mermaid_source.contains(r#"deploy[["Deploy to Staging"]]"#));
        assert!(result.mermaid_source.contains("style test fill:#d4edda,stroke:#000,color:#000"));
        assert!(result.node_map.contains_key(&Id::new("start").expect("id")));
    }

    fn state_mapping() -> GraphMapping {
        GraphMapping {
            map: MapHeader { id: "state".into(), version: 1, mermaid_type: "stateDiagram-v2".into(), direction_field: None, default_direction: None },
            node_shapes: NodeShapes {
                source_path: "nodes".into(),
                id_field: "_key".into(),
                label_field: "label".into(),
                shape_field: "shape".into(),
                default_shapes: None,
                shapes: HashMap::new(),
                initial_connector: Some("[*] --> {id}".into()),
                final_connector: Some("{id} --> [*]".into()),
            },
            edge_links: EdgeLinks {
                source_path: "nodes.*.transitions".into(),
                from_field: "to".into(),
                from_implicit: Some("_parent_key".into()),
                to_field: "to".into(),
                label_field: Some("event".into()),
                link_styles: HashMap::new(),
                label_template: None,
            },
            style_rules: None,
            transforms: None,
            annotations: None,
            custom_renderer: None,
        }
    }

    #[test]
    fn scenario_s2_state_machine_with_initial_and_final() {
        let text = "meta:\n  graph-version: 1\nnodes:\n  init:\n    type: initial\n    transitions:\n      - {to: pending, event: submit}\n  pending:\n    type: step\n    label: Pending\n    transitions:\n      - {to: completed, event: approve, guard: isValid}\n  completed:\n    type: final\n";
        let engine = ConversionEngine::new();
        let graph_type = graph_type(state_mapping(), serde_json::json!({}));
        let result = engine.convert(text, &graph_type);

        assert!(result.mermaid_source.starts_with("stateDiagram-v2"));
        assert!(result.mermaid_source.contains("[*] --> init"));
        assert!(result.mermaid_source.contains("pending : Pending"));
        assert!(result.mermaid_source.contains("pending --> completed : approve [isValid]"));
        assert!(result.mermaid_source.contains("completed --> [*]"));
    }

    fn er_mapping() -> GraphMapping {
        GraphMapping {
            map: MapHeader { id: "er".into(), version: 1, mermaid_type: "erDiagram".into(), direction_field: None, default_direction: None },
            node_shapes: NodeShapes {
                source_path: "entities".into(),
                id_field: "_key".into(),
                label_field: "label".into(),
                shape_field: "shape".into(),
                default_shapes: None,
                shapes: HashMap::new(),
                initial_connector: None,
                final_connector: None,
            },
            edge_links: EdgeLinks {
                source_path: "relations".into(),
                from_field: "from".into(),
                from_implicit: None,
                to_field: "to".into(),
                label_field: Some("label".into()),
                link_styles: HashMap::new(),
                label_template: None,
            },
            style_rules: None,
            transforms: None,
            annotations: None,
            custom_renderer: None,
        }
    }

    #[test]
    fn scenario_s3_er_diagram() {
        let text = "meta:\n  graph-version: 1\nentities:\n  User:\n    attributes:\n      - {type: int, name: id, key: PK}\n      - {type: string, name: email}\n  Role: {}\nrelations:\n  - {from: User, to: Role, type: many-to-one, label: has}\n";
        let engine = ConversionEngine::new();
        let graph_type = graph_type(er_mapping(), serde_json::json!({}));
        let result = engine.convert(text, &graph_type);

        assert!(result.mermaid_source.starts_with("erDiagram"));
        assert!(result.mermaid_source.contains("User {"));
        assert!(result.mermaid_source.contains("int id PK"));
        assert!(result.mermaid_source.contains("string email"));
        assert!(result.mermaid_source.contains("User }o--|| Role : \"has\""));
    }

    #[test]
    fn scenario_s4_id_sanitization_keeps_node_map_key_original() {
        let text = "meta:\n  graph-version: 1\nnodes:\n  node-a: {type: start, label: A}\n";
        let engine = ConversionEngine::new();
        let graph_type = graph_type(flowchart_mapping(), serde_json::json!({}));
        let result = engine.convert(text, &graph_type);

        assert!(result.mermaid_source.contains("node_a"));
        assert!(!result.mermaid_source.contains("node-a"));
        assert!(result.node_map.contains_key(&Id::new("node-a").expect("id")));
    }

    #[test]
    fn scenario_s5_edit_then_reconvert_preserves_comment() {
        let text = "meta:\n  graph-version: 1\nnodes:\n  # keep me\n  start: {type: start, label: Begin}\n";
        let doc = crate::cst::ParsedYaml::parse(text).expect("parse");
        let edited = doc.edit_value("nodes.start.label", &crate::cst::YamlValue::String("Renamed".into()));
        assert!(edited.contains("# keep me"));

        let engine = ConversionEngine::new();
        let graph_type = graph_type(flowchart_mapping(), serde_json::json!({}));
        let result = engine.convert(&edited, &graph_type);
        assert!(result.mermaid_source.contains("Renamed"));
    }

    #[test]
    fn missing_graph_version_blocks_conversion() {
        let text = "nodes:\n  start: {type: start, label: Begin}\n";
        let engine = ConversionEngine::new();
        let graph_type = graph_type(flowchart_mapping(), serde_json::json!({}));
        let result = engine.convert(text, &graph_type);

        assert!(result.mermaid_source.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "/meta/graph-version");
    }

    #[test]
    fn parse_error_leaves_mermaid_source_empty() {
        let text = "nodes: [unterminated";
        let engine = ConversionEngine::new();
        let graph_type = graph_type(flowchart_mapping(), serde_json::json!({}));
        let result = engine.convert(text, &graph_type);

        assert!(result.mermaid_source.is_empty());
        assert!(!result.errors.is_empty());
    }
}
