use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedMappingVersionError {
    pub version: u32,
    pub supported_versions: Vec<u32>,
}

impl fmt::Display for UnsupportedMappingVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported mapping version {} (supported: {:?})",
            self.version, self.supported_versions
        )
    }
}

impl std::error::Error for UnsupportedMappingVersionError {}

/// Raised when a mapping file's own `map.version` doesn't match the `v<N>`
/// folder it was loaded from (spec.md §4.4 new detail). Fatal for that one
/// graph type only — `loadFromFolder` keeps loading its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingVersionMismatch {
    pub folder_version: u32,
    pub declared_version: u32,
    pub path: PathBuf,
}

impl fmt::Display for MappingVersionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mapping at {:?} declares version {} but lives under v{}",
            self.path, self.declared_version, self.folder_version
        )
    }
}

impl std::error::Error for MappingVersionMismatch {}

#[derive(Debug)]
pub enum MappingLoadError {
    Io { path: PathBuf, source: std::io::Error },
    Yaml { path: PathBuf, source: serde_yaml::Error },
    Json { path: PathBuf, source: serde_json::Error },
    UnsupportedVersion { path: PathBuf, source: UnsupportedMappingVersionError },
    VersionMismatch(MappingVersionMismatch),
    MissingManifestField { path: PathBuf, field: &'static str },
}

impl fmt::Display for MappingLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error reading {path:?}: {source}"),
            Self::Yaml { path, source } => write!(f, "yaml error in {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error in {path:?}: {source}"),
            Self::UnsupportedVersion { path, source } => write!(f, "in {path:?}: {source}"),
            Self::VersionMismatch(err) => write!(f, "{err}"),
            Self::MissingManifestField { path, field } => {
                write!(f, "{path:?} is missing required field `{field}`")
            }
        }
    }
}

impl std::error::Error for MappingLoadError {}
