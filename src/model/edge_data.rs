use std::collections::HashMap;

use serde_json::Value as JsonValue;

/// One extracted graph edge (spec.md §3 EdgeData). For co-located arrays
/// (`sourcePath` matching `<nodesPath>.*.<arrayName>`), `from` is filled in
/// from the owning node's key rather than read off a field.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub from: String,
    pub to: String,
    pub fields: HashMap<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_with_fields() {
        let mut fields = HashMap::new();
        fields.insert("label".to_owned(), JsonValue::String("ok".into()));
        let edge = EdgeData {
            from: "a".into(),
            to: "b".into(),
            fields,
        };
        assert_eq!(edge.from, "a");
        assert_eq!(edge.fields.get("label").and_then(JsonValue::as_str), Some("ok"));
    }
}
