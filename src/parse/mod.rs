//! Parse phase: JSON → Rust types, reference detection, graph primitive.

pub mod graph;
pub mod reference;
pub mod types;

pub use graph::DependencyGraph;
pub use reference::{ParameterValue, ValueReference};
pub use types::*;

use crate::error::EngineError;

/// Deserialize a workflow JSON string into a `WorkflowDefinition`.
pub fn parse_workflow(json: &str) -> Result<WorkflowDefinition, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::parse("workflow", e))
}

/// Deserialize the metadata catalog (`{ actionType: ActionMetadata }`).
pub fn parse_catalog(json: &str) -> Result<MetadataCatalog, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::parse("metadata catalog", e))
}

/// Deserialize user-entered values (`{ actionId: { name: value } }`).
pub fn parse_parameter_values(json: &str) -> Result<ParameterValues, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::parse("parameter values", e))
}
