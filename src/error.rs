//! Top-level error taxonomy (spec.md §7). Each named error is its own type,
//! living in the module that raises it; [`GraphloomError`] only aggregates
//! them via `From` impls for callers at the outermost boundaries (registry
//! load, the `cli` binary) that want one enum to match on, matching the
//! teacher's `render::diagram::DiagramRenderError` aggregation style.
//!
//! Conversion itself never raises any of these: `ConversionEngine::convert`
//! returns a `ConversionResult` whose `errors` field carries `ParseError`s
//! and schema `ValidationError`s as data, never as a `Result::Err` (spec.md
//! §7 propagation policy).

use std::fmt;
use std::path::PathBuf;

use crate::cst::YamlParseError;
use crate::mapping_loader::MappingLoadError;
use crate::schema::UnresolvedRefError;

/// Raised when a document's `meta.graph-version` is missing or not an
/// integer (spec.md §6 front-matter contract). Fatal for that document —
/// the host is expected to prompt the user rather than attempt conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingGraphVersionError {
    pub path: Option<PathBuf>,
}

impl fmt::Display for MissingGraphVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path:?} is missing a valid `meta.graph-version` integer"),
            None => f.write_str("document is missing a valid `meta.graph-version` integer"),
        }
    }
}

impl std::error::Error for MissingGraphVersionError {}

/// Raised when a host-side operation the engine depends on (applying a
/// workspace edit, opening the active text editor) is rejected or
/// unavailable. Non-fatal to the coordinator: the triggering operation
/// becomes best-effort and is reported to the user, but later operations
/// still run (spec.md §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInterfaceError {
    pub operation: &'static str,
    pub reason: String,
}

impl HostInterfaceError {
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self { operation, reason: reason.into() }
    }
}

impl fmt::Display for HostInterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host interface error during {}: {}", self.operation, self.reason)
    }
}

impl std::error::Error for HostInterfaceError {}

#[derive(Debug)]
pub enum GraphloomError {
    Parse(YamlParseError),
    UnresolvedRef(UnresolvedRefError),
    MappingLoad(MappingLoadError),
    MissingGraphVersion(MissingGraphVersionError),
    HostInterface(HostInterfaceError),
}

impl fmt::Display for GraphloomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::UnresolvedRef(err) => write!(f, "{err}"),
            Self::MappingLoad(err) => write!(f, "{err}"),
            Self::MissingGraphVersion(err) => write!(f, "{err}"),
            Self::HostInterface(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GraphloomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::UnresolvedRef(err) => Some(err),
            Self::MappingLoad(err) => Some(err),
            Self::MissingGraphVersion(err) => Some(err),
            Self::HostInterface(err) => Some(err),
        }
    }
}

impl From<YamlParseError> for GraphloomError {
    fn from(value: YamlParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<UnresolvedRefError> for GraphloomError {
    fn from(value: UnresolvedRefError) -> Self {
        Self::UnresolvedRef(value)
    }
}

impl From<MappingLoadError> for GraphloomError {
    fn from(value: MappingLoadError) -> Self {
        Self::MappingLoad(value)
    }
}

impl From<MissingGraphVersionError> for GraphloomError {
    fn from(value: MissingGraphVersionError) -> Self {
        Self::MissingGraphVersion(value)
    }
}

impl From<HostInterfaceError> for GraphloomError {
    fn from(value: HostInterfaceError) -> Self {
        Self::HostInterface(value)
    }
}

/// Checks the front-matter contract: `meta.graph-version` must be present
/// and an integer (spec.md §6). Called once per conversion before extraction.
pub fn check_graph_version(data: &crate::cst::YamlValue) -> Result<i64, MissingGraphVersionError> {
    data.get_path("meta.graph-version")
        .and_then(crate::cst::YamlValue::as_i64)
        .ok_or(MissingGraphVersionError { path: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ParsedYaml;

    #[test]
    fn check_graph_version_reads_integer() {
        let doc = ParsedYaml::parse("meta:\n  graph-version: 1\n").expect("parse");
        assert_eq!(check_graph_version(&doc.data), Ok(1));
    }

    #[test]
    fn check_graph_version_rejects_missing() {
        let doc = ParsedYaml::parse("meta:\n  other: 1\n").expect("parse");
        assert!(check_graph_version(&doc.data).is_err());
    }

    #[test]
    fn check_graph_version_rejects_non_integer() {
        let doc = ParsedYaml::parse("meta:\n  graph-version: \"one\"\n").expect("parse");
        assert!(check_graph_version(&doc.data).is_err());
    }
}
