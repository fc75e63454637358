use serde_json::{Map, Value as JsonValue};

use crate::model::{humanize_key, FieldKind, FieldSchema, ScalarType};

use super::error::UnresolvedRefError;

/// Resolves `$ref`/`$defs` schemas, composes an overlay over a base schema,
/// and builds the recursive field-schema trees the node editor renders from.
/// Stateless: every function takes the schema document it needs explicitly,
/// so callers are free to cache compiled/composed results by whatever key
/// they like (the registry caches by `(graphTypeId, version)`).
pub struct SchemaResolver;

impl SchemaResolver {
    /// Resolves `#/$defs/<name>` or `#/definitions/<name>` (and any other
    /// JSON Pointer) against `root`, merging the referencing schema's own
    /// sibling properties (everything beside `$ref`) over the resolved target.
    pub fn resolve_ref(root: &JsonValue, referencing_schema: &JsonValue) -> Result<JsonValue, UnresolvedRefError> {
        let Some(reference) = referencing_schema.get("$ref").and_then(JsonValue::as_str) else {
            return Ok(referencing_schema.clone());
        };
        let target = resolve_pointer(root, reference).ok_or_else(|| UnresolvedRefError::new(reference))?;
        let mut merged = target.clone();
        if let (Some(merged_obj), Some(sibling_obj)) = (merged.as_object_mut(), referencing_schema.as_object()) {
            for (key, value) in sibling_obj {
                if key != "$ref" {
                    merged_obj.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(merged)
    }

    /// Navigates `properties.<segment>` stepwise for each dot-separated
    /// segment of `section_path`, resolving `$ref` at each hop, and finally
    /// returns the map-value schema (`additionalProperties`) or item schema
    /// (`items`) at the end of the walk.
    pub fn extract_node_sub_schema(root: &JsonValue, section_path: &str) -> Result<JsonValue, UnresolvedRefError> {
        let mut current = Self::resolve_ref(root, root)?;
        for segment in section_path.split('.').filter(|s| !s.is_empty()) {
            let next = current
                .get("properties")
                .and_then(|props| props.get(segment))
                .cloned()
                .ok_or_else(|| UnresolvedRefError::new(section_path))?;
            current = Self::resolve_ref(root, &next)?;
        }
        if let Some(additional) = current.get("additionalProperties") {
            return Self::resolve_ref(root, additional);
        }
        if let Some(items) = current.get("items") {
            return Self::resolve_ref(root, items);
        }
        Err(UnresolvedRefError::new(section_path))
    }

    /// Deep-clones `base` and layers `overlay` over it: when both declare
    /// `$defs.node`, the composed schema's node definition becomes
    /// `{allOf: [base.node, overlay.node]}`; root-level `properties` from
    /// `overlay` are added wherever `base` doesn't already declare them.
    pub fn compose_schemas(base: &JsonValue, overlay: &JsonValue) -> JsonValue {
        let mut result = base.clone();

        if let (Some(base_node), Some(overlay_node)) = (base.pointer("/$defs/node"), overlay.pointer("/$defs/node")) {
            let composed = serde_json::json!({ "allOf": [base_node, overlay_node] });
            if let Some(defs) = result.as_object_mut().and_then(ensure_object_entry("$defs")) {
                defs.insert("node".to_owned(), composed);
            }
        }

        if let Some(overlay_props) = overlay.get("properties").and_then(JsonValue::as_object) {
            if let Some(result_props) = result.as_object_mut().and_then(ensure_object_entry("properties")) {
                for (key, value) in overlay_props {
                    result_props.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }

        result
    }

    /// Builds a `FieldSchema` tree for `schema` (an object or array schema
    /// node, already `$ref`-resolved), rooted at `base_path`.
    pub fn build_field_schemas(root: &JsonValue, schema: &JsonValue, base_path: &str, required: &[String]) -> Vec<FieldSchema> {
        let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) else {
            return Vec::new();
        };
        let nested_required: Vec<String> = schema
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|items| items.iter().filter_map(JsonValue::as_str).map(str::to_owned).collect())
            .unwrap_or_default();
        let required = if nested_required.is_empty() { required } else { &nested_required };

        properties
            .iter()
            .map(|(key, field_schema)| {
                let resolved = Self::resolve_ref(root, field_schema).unwrap_or_else(|_| field_schema.clone());
                let path = format!("{base_path}/{key}");
                build_one(root, &resolved, &path, key, required.contains(key))
            })
            .collect()
    }
}

fn ensure_object_entry<'a>(key: &'static str) -> impl FnOnce(&'a mut Map<String, JsonValue>) -> Option<&'a mut Map<String, JsonValue>> {
    move |object| {
        object
            .entry(key)
            .or_insert_with(|| JsonValue::Object(Map::new()))
            .as_object_mut()
    }
}

fn build_one(root: &JsonValue, schema: &JsonValue, path: &str, key: &str, required: bool) -> FieldSchema {
    let label = schema
        .get("title")
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| humanize_key(key));
    let x_widget = schema.get("x-widget").cloned();
    let schema_type = schema.get("type").and_then(JsonValue::as_str);

    let kind = if let Some(values) = schema.get("enum").and_then(JsonValue::as_array) {
        FieldKind::Enum {
            values: values.iter().filter_map(JsonValue::as_str).map(str::to_owned).collect(),
        }
    } else if schema_type == Some("array") {
        let item_schema = schema
            .get("items")
            .map(|items| SchemaResolver::resolve_ref(root, items).unwrap_or_else(|_| items.clone()))
            .unwrap_or(JsonValue::Null);
        let item_path = format!("{path}/items");
        FieldKind::Array {
            item_schema: Box::new(build_one(root, &item_schema, &item_path, "items", false)),
        }
    } else if schema_type == Some("object") {
        FieldKind::Object {
            properties: SchemaResolver::build_field_schemas(root, schema, path, &[]),
        }
    } else {
        FieldKind::Scalar {
            scalar_type: schema_type.and_then(ScalarType::from_schema_type).unwrap_or(ScalarType::String),
        }
    };

    FieldSchema { path: path.to_owned(), label, required, kind, x_widget }
}

fn resolve_pointer<'a>(root: &'a JsonValue, pointer: &str) -> Option<&'a JsonValue> {
    let pointer = pointer.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    root.pointer(pointer)
}
