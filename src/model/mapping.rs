use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// The structured record produced by parsing a mapping file (spec.md §3
/// GraphMapping). Field names are camelCase to match the schema's own
/// vocabulary; `MappingLoader`'s V1 parser normalizes kebab-case source keys
/// into this shape before deserializing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMapping {
    pub map: MapHeader,
    pub node_shapes: NodeShapes,
    pub edge_links: EdgeLinks,
    #[serde(default)]
    pub style_rules: Option<StyleRules>,
    #[serde(default)]
    pub transforms: Option<Vec<TransformRule>>,
    /// Opaque passthrough, forwarded to conversion callbacks untouched — the
    /// engine never interprets these, so they stay as raw YAML values rather
    /// than being coerced into the JSON model used for schema validation.
    #[serde(default)]
    pub annotations: Option<serde_yaml::Value>,
    #[serde(default)]
    pub custom_renderer: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapHeader {
    pub id: String,
    pub version: u32,
    pub mermaid_type: String,
    #[serde(default)]
    pub direction_field: Option<String>,
    #[serde(default)]
    pub default_direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeShapes {
    pub source_path: String,
    pub id_field: String,
    pub label_field: String,
    pub shape_field: String,
    #[serde(default)]
    pub default_shapes: Option<HashMap<String, String>>,
    #[serde(default)]
    pub shapes: HashMap<String, String>,
    #[serde(default)]
    pub initial_connector: Option<String>,
    #[serde(default)]
    pub final_connector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLinks {
    pub source_path: String,
    pub from_field: String,
    #[serde(default)]
    pub from_implicit: Option<String>,
    pub to_field: String,
    #[serde(default)]
    pub label_field: Option<String>,
    #[serde(default)]
    pub link_styles: HashMap<String, String>,
    #[serde(default)]
    pub label_template: Option<String>,
}

impl EdgeLinks {
    /// True when `sourcePath` names a per-node array co-located with the node
    /// (`<nodesPath>.*.<arrayName>`) rather than a top-level edge list.
    pub fn is_colocated(&self) -> bool {
        self.source_path.contains(".*.")
    }

    /// The array field name for a co-located `sourcePath`, e.g. `"transitions"`
    /// out of `"nodes.*.transitions"`. `None` for top-level edge lists.
    pub fn colocated_array_name(&self) -> Option<&str> {
        self.source_path.split_once(".*.").map(|(_, name)| name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRules {
    pub field: String,
    pub rules: HashMap<String, StyleRule>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRule {
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformScope {
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransformRule {
    pub scope: TransformScope,
    #[serde(rename = "match")]
    pub match_clause: MatchClause,
    pub js: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchClause {
    pub field: String,
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(default)]
    pub equals: Option<JsonValue>,
    #[serde(default)]
    pub pattern: Option<String>,
}

impl MatchClause {
    /// Evaluates this clause's single predicate (spec.md transforms run in
    /// declaration order and the first whose predicate matches wins).
    pub fn matches(&self, fields: &HashMap<String, JsonValue>) -> bool {
        let value = fields.get(&self.field);
        if let Some(exists) = self.exists {
            return value.is_some() == exists;
        }
        if let Some(expected) = &self.equals {
            return value == Some(expected);
        }
        if let Some(pattern) = &self.pattern {
            return match value.and_then(JsonValue::as_str) {
                Some(text) => regex::Regex::new(pattern).is_ok_and(|re| re.is_match(text)),
                None => false,
            };
        }
        false
    }
}
