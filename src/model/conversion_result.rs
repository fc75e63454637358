use std::collections::HashMap;
use std::fmt;

use super::ids::NodeId;
use super::source_range::SourceRange;

/// The outcome of one `ConversionEngine::convert` call (spec.md §3
/// ConversionResult). `node_map`/`edge_map` let the host highlight the YAML
/// range backing a Mermaid element the user clicked on, and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub mermaid_source: String,
    pub errors: Vec<ValidationError>,
    pub node_map: HashMap<NodeId, SourceRange>,
    pub edge_map: HashMap<usize, SourceRange>,
}

impl ConversionResult {
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|error| error.severity == Severity::Error)
    }
}

/// A single schema or parse problem surfaced alongside conversion output.
/// `path` is a `/`-rooted JSON Pointer, or `/` for a root-level problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}
