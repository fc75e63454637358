use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::ids::GraphTypeId;
use super::mapping::GraphMapping;

/// A registered graph type: one `(id, version)` unit discovered by the
/// registry from a mapping folder. Immutable once built — a reload replaces
/// the whole registry rather than mutating entries in place (spec.md §3
/// Lifecycles).
#[derive(Debug, Clone)]
pub struct GraphType {
    pub id: GraphTypeId,
    pub version: u32,
    pub file_patterns: Vec<String>,
    pub schema: Arc<JsonValue>,
    pub mapping: Arc<GraphMapping>,
    pub style_sheet: Option<String>,
    /// The folder this graph type was loaded from, kept for error messages
    /// and for `loadFromFolder` reload diagnostics.
    pub source_dir: PathBuf,
}

impl GraphType {
    pub fn key(&self) -> (GraphTypeId, u32) {
        (self.id.clone(), self.version)
    }

    pub fn matches_file(&self, path: &str) -> bool {
        self.file_patterns.iter().any(|pattern| glob_match(pattern, path))
    }
}

/// Minimal `*`/`**` glob matcher for the simple patterns mapping files use
/// (`*.graph.yaml`, `**/*.flow.yaml`). Not a general glob implementation —
/// the registry never needs character classes or brace expansion.
fn glob_match(pattern: &str, path: &str) -> bool {
    if let Some(rest) = pattern.strip_prefix("**/") {
        return glob_match(rest, path) || path.rsplit_once('/').is_some_and(|(_, tail)| glob_match(rest, tail));
    }
    match pattern.split_once('*') {
        None => pattern == path,
        Some((prefix, suffix)) => {
            path.len() >= prefix.len() + suffix.len()
                && path.starts_with(prefix)
                && path.ends_with(suffix)
                && !suffix.contains('*')
        }
    }
}
