use std::fmt;

/// The plain structured value produced by a parse, with no byte-range or
/// comment information attached (that lives in the parallel [`super::node::CstNode`]
/// tree). Mapping entries preserve YAML insertion order — invariant 3 in
/// spec.md §3 depends on this for initial/final connector selection.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<YamlValue>),
    Mapping(Vec<(String, YamlValue)>),
}

impl YamlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, YamlValue)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[YamlValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Looks up a key in a mapping value. Returns `None` for non-mappings
    /// and for missing keys alike — callers that must tell the two apart
    /// use [`YamlValue::as_mapping`] directly.
    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_index(&self, index: usize) -> Option<&YamlValue> {
        self.as_sequence()?.get(index)
    }

    /// Resolves a dot-path (e.g. `"nodes.start.label"`, with numeric segments
    /// treated as sequence indices) against this value.
    pub fn get_path(&self, path: &str) -> Option<&YamlValue> {
        let mut current = self;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match segment.parse::<usize>() {
                Ok(index) => current.get_index(index)?,
                Err(_) => current.get(segment)?,
            };
        }
        Some(current)
    }

    /// Renders a scalar the way it would be emitted as a Mermaid label or a
    /// tree-view value: strings pass through, everything else formats with
    /// `Display`.
    pub fn display_scalar(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::Sequence(_) | Self::Mapping(_) => String::new(),
        }
    }
}

impl fmt::Display for YamlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_scalar())
    }
}

impl From<&YamlValue> for serde_json::Value {
    /// Schema validation and node/edge field extraction both work against
    /// `serde_json::Value` (spec.md's vocabulary is JSON Schema); this is the
    /// one conversion point between the YAML-native tree and that world.
    fn from(value: &YamlValue) -> Self {
        match value {
            YamlValue::Null => serde_json::Value::Null,
            YamlValue::Bool(b) => serde_json::Value::Bool(*b),
            YamlValue::Int(n) => serde_json::Value::from(*n),
            YamlValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            YamlValue::String(s) => serde_json::Value::String(s.clone()),
            YamlValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            YamlValue::Mapping(entries) => serde_json::Value::Object(
                entries.iter().map(|(k, v)| (k.clone(), serde_json::Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for YamlValue {
    /// The inverse of `From<&YamlValue> for serde_json::Value`, used when an
    /// inbound edit instruction's JSON value needs writing back through the
    /// CST (spec.md §4.10 `applyEdit`).
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => YamlValue::Null,
            serde_json::Value::Bool(b) => YamlValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(YamlValue::Int)
                .unwrap_or_else(|| YamlValue::Float(n.as_f64().unwrap_or(0.0))),
            serde_json::Value::String(s) => YamlValue::String(s.clone()),
            serde_json::Value::Array(items) => YamlValue::Sequence(items.iter().map(YamlValue::from).collect()),
            serde_json::Value::Object(fields) => {
                YamlValue::Mapping(fields.iter().map(|(k, v)| (k.clone(), YamlValue::from(v))).collect())
            }
        }
    }
}
