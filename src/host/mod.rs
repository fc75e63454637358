//! Narrow async traits the coordinator calls into for everything that
//! touches the outside world (spec.md §6.1). Keeping these as small traits
//! rather than reaching into transport/editor details directly matches the
//! teacher's pattern of keeping `mcp::server` calling into `ops`/`query`
//! through plain function calls and never touching transport concerns.
//!
//! [`NullHost`] implements every trait as a no-op/"not available" stub, used
//! in tests and by the `cli` binary, which only has a text document and no
//! real webview to talk to.

use async_trait::async_trait;

use crate::error::HostInterfaceError;
use crate::protocol::OutboundMessage;

/// Reads the full text of the document currently being edited.
#[async_trait]
pub trait TextDocumentHost: Send + Sync {
    async fn read_text(&self) -> Result<String, HostInterfaceError>;
}

/// Applies a computed replacement text as one atomic edit (spec.md §5
/// ordering guarantee 2: edits are serialized by the host's own queue).
#[async_trait]
pub trait WorkspaceEditHost: Send + Sync {
    async fn apply_edit(&self, new_text: &str) -> Result<(), HostInterfaceError>;
}

/// Delivers one outbound message to the webview (spec.md §6 message protocol).
#[async_trait]
pub trait WebviewHost: Send + Sync {
    async fn post_message(&self, message: OutboundMessage) -> Result<(), HostInterfaceError>;
}

/// Asks the user for a string or a yes/no confirmation (used by
/// `requestAddNode`/`requestDuplicateNode`/`requestRenameNode`).
#[async_trait]
pub trait PromptHost: Send + Sync {
    async fn prompt_string(&self, message: &str) -> Result<Option<String>, HostInterfaceError>;
    async fn confirm(&self, message: &str) -> Result<bool, HostInterfaceError>;
}

/// No-op host used in tests and by the `cli` binary. Every read returns a
/// `HostInterfaceError` (nothing to read) and every write is dropped and
/// reported as unavailable, matching spec.md §7's "operation becomes
/// best-effort" contract rather than panicking.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

#[async_trait]
impl TextDocumentHost for NullHost {
    async fn read_text(&self) -> Result<String, HostInterfaceError> {
        Err(HostInterfaceError::new("read_text", "no text document host configured"))
    }
}

#[async_trait]
impl WorkspaceEditHost for NullHost {
    async fn apply_edit(&self, _new_text: &str) -> Result<(), HostInterfaceError> {
        Err(HostInterfaceError::new("apply_edit", "no workspace edit host configured"))
    }
}

#[async_trait]
impl WebviewHost for NullHost {
    async fn post_message(&self, _message: OutboundMessage) -> Result<(), HostInterfaceError> {
        Err(HostInterfaceError::new("post_message", "no webview host configured"))
    }
}

#[async_trait]
impl PromptHost for NullHost {
    async fn prompt_string(&self, _message: &str) -> Result<Option<String>, HostInterfaceError> {
        Err(HostInterfaceError::new("prompt_string", "no prompt host configured"))
    }

    async fn confirm(&self, _message: &str) -> Result<bool, HostInterfaceError> {
        Err(HostInterfaceError::new("confirm", "no prompt host configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_host_read_text_reports_unavailable() {
        let host = NullHost;
        assert!(host.read_text().await.is_err());
    }

    #[tokio::test]
    async fn null_host_confirm_reports_unavailable() {
        let host = NullHost;
        assert!(host.confirm("delete?").await.is_err());
    }
}
