//! Core data model: graph types, mappings, extracted node/edge data, and
//! conversion results. Shared by every other module in the crate.

pub mod conversion_result;
pub mod edge_data;
pub mod field_schema;
pub mod graph_type;
pub mod ids;
pub mod mapping;
pub mod node_data;
pub mod source_range;

pub use conversion_result::{ConversionResult, Severity, ValidationError};
pub use edge_data::EdgeData;
pub use field_schema::{humanize_key, FieldKind, FieldSchema, ScalarType};
pub use graph_type::GraphType;
pub use ids::{GraphTypeId, Id, IdError, NodeId};
pub use mapping::{
    EdgeLinks, GraphMapping, MapHeader, MatchClause, NodeShapes, StyleRule, StyleRules,
    TransformRule, TransformScope,
};
pub use node_data::NodeData;
pub use source_range::SourceRange;
