use crate::model::{EdgeData, NodeData};

/// Optional host hooks threaded through a conversion (spec.md §4.7 point 12).
/// Every method has a no-op default so a host only needs to override the
/// ones it cares about. `prepare` is the only one awaited — it runs before
/// the YAML is even parsed, matching §5's suspension-point ordering.
#[async_trait::async_trait]
pub trait ConversionCallbacks: Send + Sync {
    async fn prepare(&self) {}

    fn set_mermaid_type(&self, _mermaid_type: &str) {}

    /// Returns extra lines to append right after a node's own rendered block.
    fn on_node_emit(&self, _id: &str, _node: &NodeData, _lines: &[String]) -> Vec<String> {
        Vec::new()
    }

    /// Returns extra lines to append right after an edge's own rendered block.
    fn on_edge_emit(&self, _edge: &EdgeData, _lines: &[String]) -> Vec<String> {
        Vec::new()
    }

    /// Returns extra lines appended at the very end of the Mermaid body.
    fn on_complete(&self, _all_ids: &[String], _output: &[String]) -> Vec<String> {
        Vec::new()
    }
}

/// The default host: every hook is a no-op. Used by [`super::ConversionEngine::convert`]
/// when called without callbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCallbacks;

#[async_trait::async_trait]
impl ConversionCallbacks for NullCallbacks {}
