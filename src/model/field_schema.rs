use serde_json::Value as JsonValue;

/// A recursive field-schema tree built by `SchemaResolver::buildFieldSchemas`,
/// used by the node editor to render a form for a node's fields without the
/// webview needing to understand JSON Schema itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// JSON Pointer path from the node's root, e.g. `/fields/label`.
    pub path: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
    /// Carried through untouched from the schema's `x-widget` keyword.
    pub x_widget: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar { scalar_type: ScalarType },
    Enum { values: Vec<String> },
    Array { item_schema: Box<FieldSchema> },
    Object { properties: Vec<FieldSchema> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ScalarType {
    pub fn from_schema_type(schema_type: &str) -> Option<Self> {
        match schema_type {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// Humanizes a field key into a default label when the schema carries no
/// `title` (spec.md §4.3: "Labels default to `title` else humanized key").
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut capitalize_next = true;
    for ch in key.chars() {
        if ch == '_' || ch == '-' {
            out.push(' ');
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
