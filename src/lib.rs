pub mod config;
pub mod error;
pub mod order;
pub mod params;
pub mod parse;
pub mod readiness;
pub mod validate;
pub mod wasm;

pub use config::EngineConfig;
pub use error::{EngineError, ErrorKind, ValidationError, ValidationWarning};
pub use order::ParsedWorkflow;
pub use readiness::{ExecutionReadiness, ExecutionValidation, ValidationEngine};

/// Parse and order a workflow JSON document.
pub fn load_workflow(json: &str) -> Result<ParsedWorkflow, EngineError> {
    ParsedWorkflow::from_definition(parse::parse_workflow(json)?)
}
