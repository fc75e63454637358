use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value as YamlValue;

use crate::model::GraphMapping;

use super::error::MappingLoadError;

/// Parses a V1 mapping document, which may spell its section and field names
/// in kebab-case (`node-shapes`, `from-field`) instead of the camelCase the
/// in-memory `GraphMapping` uses. Value-position maps the mapping author
/// controls (shape names, style-rule keys, field names matched by
/// transforms) are left untouched — only the fixed set of structural field
/// names below is normalized.
pub fn parse_v1(raw: &YamlValue, path: &std::path::Path) -> Result<GraphMapping, MappingLoadError> {
    let normalized = normalize_root(raw);
    serde_json::from_value(normalized).map_err(|source| MappingLoadError::Json { path: path.to_owned(), source })
}

fn to_json(value: &YamlValue) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

fn get<'a>(map: &'a serde_yaml::Mapping, camel: &str, kebab: &str) -> Option<&'a YamlValue> {
    map.get(&YamlValue::String(camel.to_owned()))
        .or_else(|| map.get(&YamlValue::String(kebab.to_owned())))
}

fn normalize_root(raw: &YamlValue) -> JsonValue {
    let mut out = Map::new();
    let Some(map) = raw.as_mapping() else {
        return to_json(raw);
    };

    if let Some(header) = get(map, "map", "map").and_then(YamlValue::as_mapping) {
        out.insert("map".to_owned(), normalize_map_header(header));
    }
    if let Some(node_shapes) = get(map, "nodeShapes", "node-shapes").and_then(YamlValue::as_mapping) {
        out.insert("nodeShapes".to_owned(), normalize_node_shapes(node_shapes));
    }
    if let Some(edge_links) = get(map, "edgeLinks", "edge-links").and_then(YamlValue::as_mapping) {
        out.insert("edgeLinks".to_owned(), normalize_edge_links(edge_links));
    }
    if let Some(style_rules) = get(map, "styleRules", "style-rules") {
        out.insert("styleRules".to_owned(), normalize_style_rules(style_rules));
    }
    if let Some(transforms) = get(map, "transforms", "transforms").and_then(YamlValue::as_sequence) {
        out.insert(
            "transforms".to_owned(),
            JsonValue::Array(transforms.iter().map(normalize_transform).collect()),
        );
    }
    if let Some(annotations) = get(map, "annotations", "annotations") {
        out.insert("annotations".to_owned(), to_json(annotations));
    }
    if let Some(custom_renderer) = get(map, "customRenderer", "custom-renderer") {
        out.insert("customRenderer".to_owned(), to_json(custom_renderer));
    }

    JsonValue::Object(out)
}

fn normalize_map_header(map: &serde_yaml::Mapping) -> JsonValue {
    let mut out = Map::new();
    if let Some(v) = get(map, "id", "id") {
        out.insert("id".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "version", "version") {
        out.insert("version".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "mermaidType", "mermaid-type") {
        out.insert("mermaidType".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "directionField", "direction-field") {
        out.insert("directionField".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "defaultDirection", "default-direction") {
        out.insert("defaultDirection".to_owned(), to_json(v));
    }
    JsonValue::Object(out)
}

fn normalize_node_shapes(map: &serde_yaml::Mapping) -> JsonValue {
    let mut out = Map::new();
    if let Some(v) = get(map, "sourcePath", "source-path") {
        out.insert("sourcePath".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "idField", "id-field") {
        out.insert("idField".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "labelField", "label-field") {
        out.insert("labelField".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "shapeField", "shape-field") {
        out.insert("shapeField".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "defaultShapes", "default-shapes") {
        out.insert("defaultShapes".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "shapes", "shapes") {
        out.insert("shapes".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "initialConnector", "initial-connector") {
        out.insert("initialConnector".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "finalConnector", "final-connector") {
        out.insert("finalConnector".to_owned(), to_json(v));
    }
    JsonValue::Object(out)
}

fn normalize_edge_links(map: &serde_yaml::Mapping) -> JsonValue {
    let mut out = Map::new();
    if let Some(v) = get(map, "sourcePath", "source-path") {
        out.insert("sourcePath".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "fromField", "from-field") {
        out.insert("fromField".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "fromImplicit", "from-implicit") {
        out.insert("fromImplicit".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "toField", "to-field") {
        out.insert("toField".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "labelField", "label-field") {
        out.insert("labelField".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "linkStyles", "link-styles") {
        out.insert("linkStyles".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "labelTemplate", "label-template") {
        out.insert("labelTemplate".to_owned(), to_json(v));
    }
    JsonValue::Object(out)
}

fn normalize_style_rules(value: &YamlValue) -> JsonValue {
    let Some(map) = value.as_mapping() else {
        return to_json(value);
    };
    let mut out = Map::new();
    if let Some(v) = get(map, "field", "field") {
        out.insert("field".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "rules", "rules") {
        out.insert("rules".to_owned(), to_json(v));
    }
    JsonValue::Object(out)
}

fn normalize_transform(value: &YamlValue) -> JsonValue {
    let Some(map) = value.as_mapping() else {
        return to_json(value);
    };
    let mut out = Map::new();
    if let Some(v) = get(map, "scope", "scope") {
        out.insert("scope".to_owned(), to_json(v));
    }
    if let Some(v) = get(map, "match", "match").and_then(YamlValue::as_mapping) {
        let mut match_out = Map::new();
        if let Some(field) = get(v, "field", "field") {
            match_out.insert("field".to_owned(), to_json(field));
        }
        if let Some(exists) = get(v, "exists", "exists") {
            match_out.insert("exists".to_owned(), to_json(exists));
        }
        if let Some(equals) = get(v, "equals", "equals") {
            match_out.insert("equals".to_owned(), to_json(equals));
        }
        if let Some(pattern) = get(v, "pattern", "pattern") {
            match_out.insert("pattern".to_owned(), to_json(pattern));
        }
        out.insert("match".to_owned(), JsonValue::Object(match_out));
    }
    if let Some(v) = get(map, "js", "js") {
        out.insert("js".to_owned(), to_json(v));
    }
    JsonValue::Object(out)
}
