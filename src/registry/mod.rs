//! Holds every loaded [`GraphType`] and answers "which graph type owns this
//! file" (spec.md §4.5 GraphTypeRegistry).

use std::path::Path;

use crate::mapping_loader::{load_from_folder, LoadOutcome, MappingLoadError};
use crate::model::{GraphType, GraphTypeId};

/// Registers graph types by `(id, version, filePatterns)`. Reload replaces
/// the whole table rather than mutating entries — graph types are immutable
/// once registered (spec.md §3 Lifecycles).
#[derive(Debug, Default)]
pub struct GraphTypeRegistry {
    graph_types: Vec<GraphType>,
}

impl GraphTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every currently registered graph type and reloads from
    /// `dir`. Returns the load errors for any folder that failed; the
    /// registry still ends up holding every graph type that loaded cleanly.
    pub fn reload_from_folder(&mut self, dir: &Path) -> Vec<MappingLoadError> {
        let LoadOutcome { graph_types, errors } = load_from_folder(dir);
        self.graph_types = graph_types;
        errors
    }

    pub fn register(&mut self, graph_type: GraphType) {
        self.graph_types.retain(|existing| existing.key() != graph_type.key());
        self.graph_types.push(graph_type);
    }

    pub fn len(&self) -> usize {
        self.graph_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph_types.is_empty()
    }

    pub fn get(&self, id: &GraphTypeId, version: u32) -> Option<&GraphType> {
        self.graph_types.iter().find(|gt| &gt.id == id && gt.version == version)
    }

    /// Returns the highest-versioned graph type whose `filePatterns` matches `path`.
    pub fn get_for_file(&self, path: &str) -> Option<&GraphType> {
        self.graph_types
            .iter()
            .filter(|gt| gt.matches_file(path))
            .max_by_key(|gt| gt.version)
    }

    /// Returns the graph type matching `path` at exactly version `version`, if any.
    pub fn get_for_file_version(&self, path: &str, version: u32) -> Option<&GraphType> {
        self.graph_types.iter().find(|gt| gt.version == version && gt.matches_file(path))
    }
}
