//! Error types shared by every phase.
//!
//! Validation findings are plain values collected into result objects.
//! `EngineError` is reserved for malformed input that the engine cannot
//! reason about at all (bad JSON, duplicate action ids, bad config).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    MissingParameter,
    InvalidType,
    OutOfRange,
    PatternMismatch,
    InvalidFormat,
    CircularDependency,
    TypeMismatch,
    UnresolvedReference,
    IncompatibleNetwork,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingParameter => "MISSING_PARAMETER",
            ErrorKind::InvalidType => "INVALID_TYPE",
            ErrorKind::OutOfRange => "OUT_OF_RANGE",
            ErrorKind::PatternMismatch => "PATTERN_MISMATCH",
            ErrorKind::InvalidFormat => "INVALID_FORMAT",
            ErrorKind::CircularDependency => "CIRCULAR_DEPENDENCY",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::UnresolvedReference => "UNRESOLVED_REFERENCE",
            ErrorKind::IncompatibleNetwork => "INCOMPATIBLE_NETWORK",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured payload for errors that need more than a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ErrorDetail {
    /// Action ids in dependency order; the first id is repeated implicitly at the end.
    #[serde(rename_all = "camelCase")]
    Cycle { cycle: Vec<String> },
    #[serde(rename_all = "camelCase")]
    TypeMismatch {
        source_action_id: String,
        source_output: String,
        source_type: String,
        target_action_id: String,
        target_parameter: String,
        target_type: String,
        can_convert: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    pub action_id: Option<String>,
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ErrorDetail>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ValidationError {
            kind,
            message: message.into(),
            action_id: None,
            parameter: None,
            detail: None,
        }
    }

    pub fn for_action(kind: ErrorKind, message: impl Into<String>, action_id: &str) -> Self {
        ValidationError {
            action_id: Some(action_id.to_string()),
            ..ValidationError::new(kind, message)
        }
    }

    pub fn for_parameter(
        kind: ErrorKind,
        message: impl Into<String>,
        action_id: &str,
        parameter: &str,
    ) -> Self {
        ValidationError {
            action_id: Some(action_id.to_string()),
            parameter: Some(parameter.to_string()),
            ..ValidationError::new(kind, message)
        }
    }

    pub fn with_detail(self, detail: ErrorDetail) -> Self {
        ValidationError {
            detail: Some(detail),
            ..self
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        match (&self.action_id, &self.parameter) {
            (Some(action), Some(param)) => {
                write!(f, " (action '{}', parameter '{}')", action, param)
            }
            (Some(action), None) => write!(f, " (action '{}')", action),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Non-blocking finding surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub message: String,
    pub action_id: Option<String>,
}

impl ValidationWarning {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationWarning {
            message: message.into(),
            action_id: None,
        }
    }

    pub fn for_action(message: impl Into<String>, action_id: &str) -> Self {
        ValidationWarning {
            message: message.into(),
            action_id: Some(action_id.to_string()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.action_id {
            Some(id) => write!(f, "{} (action '{}')", self.message, id),
            None => f.write_str(&self.message),
        }
    }
}

/// Input the engine refuses to work with.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("duplicate action id '{0}'")]
    DuplicateActionId(String),

    #[error("action id must not be empty")]
    EmptyActionId,

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("gas simulation failed: {0}")]
    Simulation(String),
}

impl EngineError {
    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        EngineError::Parse { what, source }
    }
}
