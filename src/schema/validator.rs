use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::model::ValidationError;

use super::resolver::SchemaResolver;

/// Validates decoded YAML (as `serde_json::Value`) against a JSON-Schema-like
/// document, ignoring `$schema`/`$id` meta-keys so a document doesn't need to
/// declare a draft to be usable.
#[derive(Debug, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates `data` against `schema` and returns every mismatch found.
    /// `path` uses `/`-rooted JSON Pointer, or `/` for a root-level problem.
    pub fn validate(&self, schema: &Arc<JsonValue>, data: &JsonValue) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        validate_node(schema, schema, data, "", &mut errors);
        errors
    }
}

fn validate_node(root: &JsonValue, schema: &JsonValue, data: &JsonValue, path: &str, errors: &mut Vec<ValidationError>) {
    let schema = match SchemaResolver::resolve_ref(root, schema) {
        Ok(resolved) => resolved,
        Err(err) => {
            errors.push(ValidationError::error(pointer_or_root(path), err.to_string()));
            return;
        }
    };

    if let Some(variants) = schema.get("allOf").and_then(JsonValue::as_array) {
        for variant in variants {
            validate_node(root, variant, data, path, errors);
        }
    }

    if let Some(enum_values) = schema.get("enum").and_then(JsonValue::as_array) {
        if !enum_values.contains(data) {
            errors.push(ValidationError::error(pointer_or_root(path), format!("value is not one of the allowed enum values at {path}")));
            return;
        }
    }

    if let Some(expected_type) = schema.get("type").and_then(JsonValue::as_str) {
        if !matches_type(expected_type, data) {
            errors.push(ValidationError::error(
                pointer_or_root(path),
                format!("expected type `{expected_type}`, found `{}`", json_type_name(data)),
            ));
            return;
        }
    }

    match data {
        JsonValue::Object(fields) => {
            if let Some(required) = schema.get("required").and_then(JsonValue::as_array) {
                for name in required.iter().filter_map(JsonValue::as_str) {
                    if !fields.contains_key(name) {
                        errors.push(ValidationError::error(
                            pointer_or_root(&format!("{path}/{name}")),
                            format!("missing required field `{name}`"),
                        ));
                    }
                }
            }

            if let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) {
                for (key, value) in fields {
                    if let Some(field_schema) = properties.get(key) {
                        validate_node(root, field_schema, value, &format!("{path}/{key}"), errors);
                    } else if let Some(additional) = schema.get("additionalProperties") {
                        if additional == &JsonValue::Bool(false) {
                            errors.push(ValidationError::error(
                                pointer_or_root(&format!("{path}/{key}")),
                                format!("unexpected field `{key}`"),
                            ));
                        } else if additional != &JsonValue::Bool(true) {
                            validate_node(root, additional, value, &format!("{path}/{key}"), errors);
                        }
                    }
                }
            }
        }
        JsonValue::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (index, item) in items.iter().enumerate() {
                    validate_node(root, item_schema, item, &format!("{path}/{index}"), errors);
                }
            }
        }
        _ => {}
    }
}

fn matches_type(expected: &str, data: &JsonValue) -> bool {
    match expected {
        "string" => data.is_string(),
        "boolean" => data.is_boolean(),
        "integer" => data.as_i64().is_some() || data.as_f64().is_some_and(|n| n.fract() == 0.0),
        "number" => data.is_number(),
        "object" => data.is_object(),
        "array" => data.is_array(),
        "null" => data.is_null(),
        _ => true,
    }
}

fn json_type_name(data: &JsonValue) -> &'static str {
    match data {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn pointer_or_root(path: &str) -> String {
    if path.is_empty() {
        "/".to_owned()
    } else {
        path.to_owned()
    }
}
