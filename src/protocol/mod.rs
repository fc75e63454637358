//! The host ↔ editor webview message protocol (spec.md §6). These are plain
//! serde types; the crate doesn't open a websocket or webview itself — a
//! host wires these onto whatever transport it already has (an extension
//! host's `postMessage`, a CLI's stdin/stdout, …) via [`crate::host::WebviewHost`].

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::model::{FieldSchema, NodeData, ValidationError};
use crate::tree::TreeNode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditInstruction {
    pub path: String,
    pub value: JsonValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Td,
    Lr,
    Bt,
    Rl,
}

impl Direction {
    pub fn as_mermaid(&self) -> &'static str {
        match self {
            Self::Td => "TD",
            Self::Lr => "LR",
            Self::Bt => "BT",
            Self::Rl => "RL",
        }
    }
}

/// One array-item structural edit on a node's field (reorder/add/delete),
/// carrying only the indices relevant to its own operation (spec.md §6:
/// "`{nodeId, path, index?, fromIndex?, toIndex?}`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ArrayItemEdit {
    Add { index: usize },
    Delete { index: usize },
    Reorder { from_index: usize, to_index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    Ready,
    NodeClicked { node_id: String },
    TreeNodeSelected { node_id: String },
    ApplyEdit { node_id: String, edits: Vec<EditInstruction> },
    RequestAddNode,
    RequestDuplicateNode { source_node_id: String },
    RequestDeleteNode { node_id: String },
    RequestRenameNode { old_id: String, new_id: String },
    RequestAddConnection { node_id: String },
    RequestDeleteConnection { node_id: String, connection_index: usize },
    ArrayItemOp { node_id: String, path: String, edit: ArrayItemEdit },
    ChangeDirection { direction: Direction },
    RequestExportSvg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    UpdateAll {
        yaml_text: String,
        mermaid_source: String,
        tree_data: Vec<TreeNode>,
        errors: Vec<ValidationErrorWire>,
    },
    SelectNode {
        node_id: String,
    },
    HighlightMermaidNode {
        node_id: String,
    },
    ShowNode {
        node_id: String,
        node_data: NodeDataWire,
        schema: Vec<FieldSchemaWire>,
    },
    ClearNodeEditor,
    ShowErrors {
        errors: Vec<ValidationErrorWire>,
    },
}

/// Wire-friendly mirror of [`ValidationError`] (the model type has no serde
/// derive — validation is an internal concern, this is its one boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorWire {
    pub path: String,
    pub message: String,
    pub severity: String,
}

impl From<&ValidationError> for ValidationErrorWire {
    fn from(value: &ValidationError) -> Self {
        Self {
            path: value.path.clone(),
            message: value.message.clone(),
            severity: value.severity.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDataWire {
    pub id: String,
    pub shape: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub subtype: Option<String>,
    pub fields: JsonValue,
}

impl From<&NodeData> for NodeDataWire {
    fn from(value: &NodeData) -> Self {
        Self {
            id: value.id.to_string(),
            shape: value.shape.clone(),
            node_type: value.node_type.clone(),
            subtype: value.subtype.clone(),
            fields: JsonValue::Object(value.fields.clone().into_iter().collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchemaWire {
    pub path: String,
    pub label: String,
    pub required: bool,
    pub kind: JsonValue,
    pub x_widget: Option<JsonValue>,
}

impl From<&FieldSchema> for FieldSchemaWire {
    fn from(value: &FieldSchema) -> Self {
        Self {
            path: value.path.clone(),
            label: value.label.clone(),
            required: value.required,
            kind: field_kind_to_json(&value.kind),
            x_widget: value.x_widget.clone(),
        }
    }
}

fn field_kind_to_json(kind: &crate::model::FieldKind) -> JsonValue {
    use crate::model::FieldKind;
    match kind {
        FieldKind::Scalar { scalar_type } => serde_json::json!({ "scalar": format!("{scalar_type:?}") }),
        FieldKind::Enum { values } => serde_json::json!({ "enum": values }),
        FieldKind::Array { item_schema } => serde_json::json!({
            "array": FieldSchemaWire::from(item_schema.as_ref())
        }),
        FieldKind::Object { properties } => serde_json::json!({
            "object": properties.iter().map(FieldSchemaWire::from).collect::<Vec<_>>()
        }),
    }
}
