//! Loads graph-type folders from disk into [`GraphType`] values
//! (spec.md §4.4 MappingLoader). Each supported `version` integer gets its
//! own parser; today only V1 (kebab-case mapping files) exists.

pub mod error;
mod v1;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::model::{GraphType, Id};

pub use error::{MappingLoadError, MappingVersionMismatch, UnsupportedMappingVersionError};

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Everything a folder scan produced: successfully loaded graph types, and
/// one error per folder that failed — a bad graph type never prevents its
/// siblings from loading (spec.md §4.4 new detail).
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub graph_types: Vec<GraphType>,
    pub errors: Vec<MappingLoadError>,
}

/// Reads `<dir>/v<N>/*` for every version subfolder and emits one
/// [`GraphType`] per subfolder. Each subfolder is expected to contain
/// `graph-type.yaml` (`id`, `filePatterns`, optional `styleSheet` path),
/// `schema.json`, and `mapping.yaml`.
pub fn load_from_folder(dir: &Path) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            outcome.errors.push(MappingLoadError::Io { path: dir.to_owned(), source });
            return outcome;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(folder_version) = version_from_folder_name(&path) else {
            continue;
        };

        match load_one(&path, folder_version) {
            Ok(graph_type) => outcome.graph_types.push(graph_type),
            Err(err) => outcome.errors.push(err),
        }
    }

    outcome
}

fn version_from_folder_name(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix('v')?.parse().ok()
}

fn load_one(dir: &Path, folder_version: u32) -> Result<GraphType, MappingLoadError> {
    let manifest_path = dir.join("graph-type.yaml");
    let manifest_text = read_to_string(&manifest_path)?;
    let manifest: serde_yaml::Value =
        serde_yaml::from_str(&manifest_text).map_err(|source| MappingLoadError::Yaml { path: manifest_path.clone(), source })?;

    let id = manifest
        .get("id")
        .and_then(serde_yaml::Value::as_str)
        .ok_or(MappingLoadError::MissingManifestField { path: manifest_path.clone(), field: "id" })?;
    let id = Id::new(id).map_err(|_| MappingLoadError::MissingManifestField { path: manifest_path.clone(), field: "id" })?;

    let file_patterns = manifest
        .get("filePatterns")
        .and_then(serde_yaml::Value::as_sequence)
        .map(|items| items.iter().filter_map(serde_yaml::Value::as_str).map(str::to_owned).collect())
        .unwrap_or_default();

    let style_sheet = match manifest.get("styleSheet").and_then(serde_yaml::Value::as_str) {
        Some(relative) => Some(read_to_string(&dir.join(relative))?),
        None => None,
    };

    if !SUPPORTED_VERSIONS.contains(&folder_version) {
        return Err(MappingLoadError::UnsupportedVersion {
            path: dir.to_owned(),
            source: UnsupportedMappingVersionError { version: folder_version, supported_versions: SUPPORTED_VERSIONS.to_vec() },
        });
    }

    let mapping_path = dir.join("mapping.yaml");
    let mapping_text = read_to_string(&mapping_path)?;
    let mapping_raw: serde_yaml::Value =
        serde_yaml::from_str(&mapping_text).map_err(|source| MappingLoadError::Yaml { path: mapping_path.clone(), source })?;
    let mapping = v1::parse_v1(&mapping_raw, &mapping_path)?;

    if mapping.map.version != folder_version {
        return Err(MappingLoadError::VersionMismatch(MappingVersionMismatch {
            folder_version,
            declared_version: mapping.map.version,
            path: mapping_path,
        }));
    }

    let schema_path = dir.join("schema.json");
    let schema_text = read_to_string(&schema_path)?;
    let schema: JsonValue =
        serde_json::from_str(&schema_text).map_err(|source| MappingLoadError::Json { path: schema_path, source })?;

    Ok(GraphType {
        id,
        version: folder_version,
        file_patterns,
        schema: Arc::new(schema),
        mapping: Arc::new(mapping),
        style_sheet,
        source_dir: dir.to_owned(),
    })
}

fn read_to_string(path: &PathBuf) -> Result<String, MappingLoadError> {
    fs::read_to_string(path).map_err(|source| MappingLoadError::Io { path: path.clone(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        let mut file = std::fs::File::create(path).expect("create");
        file.write_all(contents.as_bytes()).expect("write");
    }

    #[test]
    fn loads_a_well_formed_v1_graph_type() {
        let tmp = std::env::temp_dir().join(format!("graphloom-test-{}", std::process::id()));
        let v1_dir = tmp.join("v1");
        write_file(
            &v1_dir.join("graph-type.yaml"),
            "id: flowchart\nfilePatterns:\n  - \"*.flow.yaml\"\n",
        );
        write_file(
            &v1_dir.join("schema.json"),
            r#"{"type":"object","properties":{"nodes":{"type":"object"}}}"#,
        );
        write_file(
            &v1_dir.join("mapping.yaml"),
            "map:\n  id: flowchart\n  version: 1\n  mermaid-type: flowchart\nnode-shapes:\n  source-path: nodes\n  id-field: _key\n  label-field: label\n  shape-field: shape\n  shapes: {}\nedge-links:\n  source-path: edges\n  from-field: from\n  to-field: to\n",
        );

        let outcome = load_from_folder(&tmp);
        assert!(outcome.errors.is_empty(), "unexpected errors: {:?}", outcome.errors);
        assert_eq!(outcome.graph_types.len(), 1);
        assert_eq!(outcome.graph_types[0].version, 1);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn version_mismatch_does_not_abort_sibling_loads() {
        let tmp = std::env::temp_dir().join(format!("graphloom-test-mismatch-{}", std::process::id()));
        // Folder `v1` declares `version: 2` in its mapping body: folder version 1
        // is supported, so this reaches the mismatch check and fails there.
        let bad_dir = tmp.join("v1");
        write_file(&bad_dir.join("graph-type.yaml"), "id: bad\nfilePatterns: []\n");
        write_file(&bad_dir.join("schema.json"), "{}");
        write_file(
            &bad_dir.join("mapping.yaml"),
            "map:\n  id: bad\n  version: 2\n  mermaid-type: flowchart\nnode-shapes:\n  source-path: nodes\n  id-field: _key\n  label-field: label\n  shape-field: shape\n  shapes: {}\nedge-links:\n  source-path: edges\n  from-field: from\n  to-field: to\n",
        );

        // Folder `v01` also parses to folder version 1 (only supported version)
        // but is a distinct sibling directory, and its mapping body agrees with
        // the folder version, so it loads successfully alongside the failure above.
        let good_dir = tmp.join("v01");
        write_file(&good_dir.join("graph-type.yaml"), "id: good\nfilePatterns: []\n");
        write_file(&good_dir.join("schema.json"), "{}");
        write_file(
            &good_dir.join("mapping.yaml"),
            "map:\n  id: good\n  version: 1\n  mermaid-type: flowchart\nnode-shapes:\n  source-path: nodes\n  id-field: _key\n  label-field: label\n  shape-field: shape\n  shapes: {}\nedge-links:\n  source-path: edges\n  from-field: from\n  to-field: to\n",
        );

        let outcome = load_from_folder(&tmp);
        assert_eq!(outcome.graph_types.len(), 1, "unexpected graph types: {:?}", outcome.graph_types.iter().map(|g| g.id.as_str()).collect::<Vec<_>>());
        assert_eq!(outcome.graph_types[0].id.as_str(), "good");
        assert_eq!(outcome.errors.len(), 1, "unexpected errors: {:?}", outcome.errors);
        assert!(matches!(outcome.errors[0], MappingLoadError::VersionMismatch(_)));

        std::fs::remove_dir_all(&tmp).ok();
    }
}
