//! Cross-view selection and edit state machine (spec.md §4.10
//! SelectionCoordinator). Owns `currentNodeId` and the suppression latch that
//! breaks the cursor-sync/reveal-in-editor feedback loop (spec.md §5); all
//! actual document IO goes through the [`crate::host`] traits so the
//! coordinator itself never touches a transport or a text editor directly —
//! the same separation the teacher keeps between `mcp::server` and `ops`.

mod debounce;
mod ops;

pub use debounce::Debouncer;

use crate::convert::extract;
use crate::cst::ParsedYaml;
use crate::error::HostInterfaceError;
use crate::host::{PromptHost, WorkspaceEditHost};
use crate::model::GraphType;
use crate::node_editor::NodeEditorController;
use crate::protocol::{ArrayItemEdit, EditInstruction, OutboundMessage};

/// What a dispatched inbound message produced: any outbound messages to
/// deliver, and, if the document text changed, the new text (the host is
/// responsible for actually saving it — the coordinator already called
/// [`WorkspaceEditHost::apply_edit`] by the time this is returned).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoordinatorOutcome {
    pub outbound: Vec<OutboundMessage>,
    pub new_text: Option<String>,
}

impl CoordinatorOutcome {
    fn outbound_only(messages: Vec<OutboundMessage>) -> Self {
        Self { outbound: messages, new_text: None }
    }

    fn text_change(text: String, messages: Vec<OutboundMessage>) -> Self {
        Self { outbound: messages, new_text: Some(text) }
    }
}

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    current_node_id: Option<String>,
    suppress_next_selection: bool,
    node_editor: NodeEditorController,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_node_id(&self) -> Option<&str> {
        self.current_node_id.as_deref()
    }

    /// Arms the suppression latch before a programmatic selection is made,
    /// so the selection-change event it causes is swallowed rather than
    /// re-triggering the coordinator (spec.md §5 loop-breaking contract).
    pub fn arm_suppression(&mut self) {
        self.suppress_next_selection = true;
    }

    /// `nodeClicked` / `treeNodeSelected` (spec.md §5 **Select**). Consumes
    /// the suppression latch if armed; de-duplicates against the currently
    /// selected id so idempotent re-selection sends nothing.
    pub fn select(&mut self, node_id: &str, text: &str, graph_type: &GraphType) -> CoordinatorOutcome {
        if std::mem::take(&mut self.suppress_next_selection) {
            return CoordinatorOutcome::default();
        }
        if self.current_node_id.as_deref() == Some(node_id) {
            return CoordinatorOutcome::default();
        }
        self.current_node_id = Some(node_id.to_owned());

        let mut outbound = vec![
            OutboundMessage::SelectNode { node_id: node_id.to_owned() },
            OutboundMessage::HighlightMermaidNode { node_id: node_id.to_owned() },
        ];

        if node_id == "__meta__" {
            outbound.push(OutboundMessage::ClearNodeEditor);
            return CoordinatorOutcome::outbound_only(outbound);
        }

        let Ok(doc) = ParsedYaml::parse(text) else {
            outbound.push(OutboundMessage::ClearNodeEditor);
            return CoordinatorOutcome::outbound_only(outbound);
        };
        let nodes = extract::extract_nodes(&doc, &graph_type.mapping.node_shapes);
        match nodes.iter().find(|n| n.node.id.as_str() == node_id) {
            Some(found) => outbound.push(self.node_editor.show_node(&found.node, graph_type)),
            None => outbound.push(OutboundMessage::ClearNodeEditor),
        }
        CoordinatorOutcome::outbound_only(outbound)
    }

    /// `requestDeleteNode` (spec.md §4.10): deletes `nodes.<id>` and clears
    /// `currentNodeId` if it was the deleted node.
    pub async fn delete_node(&mut self, node_id: &str, text: &str, edit_host: &dyn WorkspaceEditHost) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let Ok(doc) = ParsedYaml::parse(text) else {
            return Ok(CoordinatorOutcome::default());
        };
        let new_text = doc.delete_entry(&format!("nodes.{node_id}"));
        edit_host.apply_edit(&new_text).await?;

        let mut outbound = Vec::new();
        if self.current_node_id.as_deref() == Some(node_id) {
            self.current_node_id = None;
            outbound.push(OutboundMessage::ClearNodeEditor);
        }
        Ok(CoordinatorOutcome::text_change(new_text, outbound))
    }

    /// `applyEdit{nodeId, edits[]}` (spec.md §4.10): each edit is applied to
    /// the running text in order (chained edits see prior edits' output, not
    /// the original document, per spec.md §5 ordering guarantee 2), then the
    /// whole result is written back as one workspace edit.
    pub async fn apply_edit(
        &self,
        node_id: &str,
        edits: &[EditInstruction],
        text: &str,
        edit_host: &dyn WorkspaceEditHost,
    ) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let new_text = ops::apply_edits(node_id, edits, text);
        edit_host.apply_edit(&new_text).await?;
        Ok(CoordinatorOutcome::text_change(new_text, Vec::new()))
    }

    /// `requestAddNode` (spec.md §4.10): prompts for an id, validates it,
    /// checks uniqueness against the document's existing node ids, and
    /// inserts `{label: id}` as its default value.
    pub async fn add_node(
        &self,
        text: &str,
        graph_type: &GraphType,
        prompt_host: &dyn PromptHost,
        edit_host: &dyn WorkspaceEditHost,
    ) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let Some(candidate) = prompt_host.prompt_string("New node id").await? else {
            return Ok(CoordinatorOutcome::default());
        };
        let Ok(doc) = ParsedYaml::parse(text) else {
            return Ok(CoordinatorOutcome::default());
        };
        let existing = existing_node_ids(&doc, graph_type);
        if !ops::is_valid_node_id(&candidate) || existing.contains(&candidate) {
            return Ok(CoordinatorOutcome::default());
        }

        let new_text = ops::insert_default_node(&doc, &candidate);
        edit_host.apply_edit(&new_text).await?;
        Ok(CoordinatorOutcome::text_change(new_text, Vec::new()))
    }

    /// `requestDuplicateNode(sourceNodeId)` (spec.md §4.10): clones the
    /// source node's value, drops its outgoing-link array, generates a
    /// `<src>-copy[-N]` id, confirms with the user, and inserts.
    pub async fn duplicate_node(
        &self,
        source_node_id: &str,
        text: &str,
        graph_type: &GraphType,
        prompt_host: &dyn PromptHost,
        edit_host: &dyn WorkspaceEditHost,
    ) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let Ok(doc) = ParsedYaml::parse(text) else {
            return Ok(CoordinatorOutcome::default());
        };
        let Some(source_value) = doc.data.get_path(&format!("nodes.{source_node_id}")) else {
            return Ok(CoordinatorOutcome::default());
        };

        let existing = existing_node_ids(&doc, graph_type);
        let new_id = ops::generate_duplicate_id(source_node_id, &existing);
        if !prompt_host.confirm(&format!("Duplicate {source_node_id} as {new_id}?")).await? {
            return Ok(CoordinatorOutcome::default());
        }

        let array_name = graph_type.mapping.edge_links.colocated_array_name();
        let cloned = ops::clone_without_field(source_value, array_name.unwrap_or("transitions"));
        let new_text = doc.add_map_entry("nodes", &new_id, &cloned);
        edit_host.apply_edit(&new_text).await?;
        Ok(CoordinatorOutcome::text_change(new_text, Vec::new()))
    }

    /// `requestRenameNode(old, new)` (spec.md §4.10): re-inserts the node
    /// under the new id, deletes the old entry, and rewrites every outgoing
    /// reference to the old id across every node's co-located link array.
    pub async fn rename_node(
        &mut self,
        old_id: &str,
        new_id: &str,
        text: &str,
        graph_type: &GraphType,
        edit_host: &dyn WorkspaceEditHost,
    ) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let Ok(doc) = ParsedYaml::parse(text) else {
            return Ok(CoordinatorOutcome::default());
        };
        let Some(value) = doc.data.get_path(&format!("nodes.{old_id}")).cloned() else {
            return Ok(CoordinatorOutcome::default());
        };

        let with_new = doc.add_map_entry("nodes", new_id, &value);
        let doc = ParsedYaml::parse(&with_new).unwrap_or(doc);
        let without_old = doc.delete_entry(&format!("nodes.{old_id}"));

        let doc = ParsedYaml::parse(&without_old).unwrap_or(doc);
        let final_text = ops::rewrite_references(&doc, old_id, new_id, &graph_type.mapping.edge_links);

        edit_host.apply_edit(&final_text).await?;
        if self.current_node_id.as_deref() == Some(old_id) {
            self.current_node_id = Some(new_id.to_owned());
        }
        Ok(CoordinatorOutcome::text_change(final_text, Vec::new()))
    }

    /// `requestAddConnection(nodeId)` (spec.md §4.10): prompts for the
    /// target node id and either creates the co-located link array or
    /// appends to it.
    pub async fn add_connection(
        &self,
        node_id: &str,
        text: &str,
        graph_type: &GraphType,
        prompt_host: &dyn PromptHost,
        edit_host: &dyn WorkspaceEditHost,
    ) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let Some(target) = prompt_host.prompt_string("Connect to node id").await? else {
            return Ok(CoordinatorOutcome::default());
        };
        let Ok(doc) = ParsedYaml::parse(text) else {
            return Ok(CoordinatorOutcome::default());
        };

        let array_name = graph_type.mapping.edge_links.colocated_array_name().unwrap_or("transitions");
        let to_field = &graph_type.mapping.edge_links.to_field;
        let new_text = ops::add_connection(&doc, node_id, array_name, to_field, &target);
        edit_host.apply_edit(&new_text).await?;
        Ok(CoordinatorOutcome::text_change(new_text, Vec::new()))
    }

    /// `requestDeleteConnection(nodeId, connectionIndex)` (spec.md §4.10).
    pub async fn delete_connection(
        &self,
        node_id: &str,
        connection_index: usize,
        text: &str,
        graph_type: &GraphType,
        edit_host: &dyn WorkspaceEditHost,
    ) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let Ok(doc) = ParsedYaml::parse(text) else {
            return Ok(CoordinatorOutcome::default());
        };
        let array_name = graph_type.mapping.edge_links.colocated_array_name().unwrap_or("transitions");
        let new_text = doc.delete_entry(&format!("nodes.{node_id}.{array_name}.{connection_index}"));
        edit_host.apply_edit(&new_text).await?;
        Ok(CoordinatorOutcome::text_change(new_text, Vec::new()))
    }

    /// Array-item reorder/add/delete messages (spec.md §6): routed into the
    /// same CST editing primitives as the rest of the coordinator.
    pub async fn array_item_op(
        &self,
        node_id: &str,
        path: &str,
        edit: &ArrayItemEdit,
        text: &str,
        edit_host: &dyn WorkspaceEditHost,
    ) -> Result<CoordinatorOutcome, HostInterfaceError> {
        let Ok(doc) = ParsedYaml::parse(text) else {
            return Ok(CoordinatorOutcome::default());
        };
        let full_path = format!("nodes.{node_id}.{path}");
        let new_text = ops::apply_array_item_edit(&doc, &full_path, edit);
        edit_host.apply_edit(&new_text).await?;
        Ok(CoordinatorOutcome::text_change(new_text, Vec::new()))
    }
}

fn existing_node_ids(doc: &ParsedYaml, graph_type: &GraphType) -> Vec<String> {
    extract::extract_nodes(doc, &graph_type.mapping.node_shapes)
        .into_iter()
        .map(|n| n.node.id.into_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeLinks, GraphMapping, Id, MapHeader, NodeShapes};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn graph_type() -> GraphType {
        let mapping = GraphMapping {
            map: MapHeader { id: "state".into(), version: 1, mermaid_type: "stateDiagram-v2".into(), direction_field: None, default_direction: None },
            node_shapes: NodeShapes {
                source_path: "nodes".into(),
                id_field: "_key".into(),
                label_field: "label".into(),
                shape_field: "shape".into(),
                default_shapes: None,
                shapes: Default::default(),
                initial_connector: None,
                final_connector: None,
            },
            edge_links: EdgeLinks {
                source_path: "nodes.*.transitions".into(),
                from_field: "to".into(),
                from_implicit: Some("_parent_key".into()),
                to_field: "to".into(),
                label_field: Some("event".into()),
                link_styles: Default::default(),
                label_template: None,
            },
            style_rules: None,
            transforms: None,
            annotations: None,
            custom_renderer: None,
        };
        GraphType {
            id: Id::new("state").expect("id"),
            version: 1,
            file_patterns: vec!["*.flow.yaml".into()],
            schema: Arc::new(serde_json::json!({})),
            mapping: Arc::new(mapping),
            style_sheet: None,
            source_dir: PathBuf::from("/tmp"),
        }
    }

    #[test]
    fn select_deduplicates_against_current_node() {
        let mut coordinator = SelectionCoordinator::new();
        let text = "nodes:\n  pending:\n    label: Pending\n";
        let gt = graph_type();

        let first = coordinator.select("pending", text, &gt);
        assert!(!first.outbound.is_empty());

        let second = coordinator.select("pending", text, &gt);
        assert!(second.outbound.is_empty());
    }

    #[test]
    fn select_consumes_suppression_latch() {
        let mut coordinator = SelectionCoordinator::new();
        coordinator.arm_suppression();
        let outcome = coordinator.select("pending", "nodes:\n  pending: {}\n", &graph_type());
        assert!(outcome.outbound.is_empty());
        assert_eq!(coordinator.current_node_id(), None);
    }

    #[tokio::test]
    async fn delete_node_clears_current_selection() {
        let mut coordinator = SelectionCoordinator::new();
        let text = "nodes:\n  pending:\n    label: Pending\n";
        coordinator.select("pending", text, &graph_type());

        let host = RecordingEditHost::default();
        let outcome = coordinator.delete_node("pending", text, &host).await.expect("deleted");
        assert!(!outcome.new_text.unwrap().contains("pending"));
        assert_eq!(coordinator.current_node_id(), None);
    }

    #[tokio::test]
    async fn add_node_rejects_duplicate_id() {
        let coordinator = SelectionCoordinator::new();
        let text = "nodes:\n  pending:\n    label: Pending\n";
        let prompt = FixedPrompt { string: Some("pending".to_owned()), confirm: true };
        let edit_host = RecordingEditHost::default();

        let outcome = coordinator.add_node(text, &graph_type(), &prompt, &edit_host).await.expect("no host error");
        assert!(outcome.new_text.is_none());
    }

    #[tokio::test]
    async fn add_node_inserts_new_entry() {
        let coordinator = SelectionCoordinator::new();
        let text = "nodes:\n  pending:\n    label: Pending\n";
        let prompt = FixedPrompt { string: Some("done".to_owned()), confirm: true };
        let edit_host = RecordingEditHost::default();

        let outcome = coordinator.add_node(text, &graph_type(), &prompt, &edit_host).await.expect("added");
        assert!(outcome.new_text.expect("text").contains("done"));
    }

    #[derive(Debug, Default)]
    struct RecordingEditHost {
        last_text: std::sync::Mutex<Option<String>>,
    }

    #[async_trait::async_trait]
    impl WorkspaceEditHost for RecordingEditHost {
        async fn apply_edit(&self, new_text: &str) -> Result<(), HostInterfaceError> {
            *self.last_text.lock().expect("lock") = Some(new_text.to_owned());
            Ok(())
        }
    }

    struct FixedPrompt {
        string: Option<String>,
        confirm: bool,
    }

    #[async_trait::async_trait]
    impl PromptHost for FixedPrompt {
        async fn prompt_string(&self, _message: &str) -> Result<Option<String>, HostInterfaceError> {
            Ok(self.string.clone())
        }

        async fn confirm(&self, _message: &str) -> Result<bool, HostInterfaceError> {
            Ok(self.confirm)
        }
    }
}
