//! Parameter Type Processor.
//!
//! Every declared type goes through the same three stages: `sanitize`
//! (input cleanup, optionally auto-correcting), `convert` (raw → native
//! value), and `validate_format` (range/pattern checks on the native value).
//! `process_value` chains them. No stage returns `Err`; findings travel in
//! the `ProcessResult`.

pub mod address;
pub mod boolean;
pub mod collection;
pub mod fixed_point;
pub mod integer;
pub mod suggest;
pub mod text;

pub use suggest::{Suggestion, suggest_corrections};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorKind;
use crate::parse::reference::is_empty_value;
use crate::parse::types::ParamType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOptions {
    /// Strip characters that can never be valid for the type.
    pub auto_correct: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions { auto_correct: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamIssue {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub value: Value,
    pub is_valid: bool,
    pub was_transformed: bool,
    pub errors: Vec<ParamIssue>,
    pub warnings: Vec<String>,
}

impl ProcessResult {
    pub fn unchanged(value: Value) -> Self {
        ProcessResult {
            value,
            is_valid: true,
            was_transformed: false,
            errors: vec![],
            warnings: vec![],
        }
    }

    pub fn transformed(value: Value) -> Self {
        ProcessResult {
            was_transformed: true,
            ..ProcessResult::unchanged(value)
        }
    }

    pub fn invalid(value: Value, kind: ErrorKind, message: impl Into<String>) -> Self {
        ProcessResult::unchanged(value).with_error(kind, message)
    }

    pub fn with_error(mut self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.is_valid = false;
        self.errors.push(ParamIssue {
            kind,
            message: message.into(),
        });
        self
    }

    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.warnings.push(message.into());
        self
    }

    /// Mark as transformed when `value` differs from `original`.
    pub fn transformed_if(value: Value, original: &Value) -> Self {
        if &value == original {
            ProcessResult::unchanged(value)
        } else {
            ProcessResult::transformed(value)
        }
    }

    /// Chain a later stage: its value wins, flags and findings accumulate.
    pub fn then(mut self, next: ProcessResult) -> Self {
        self.value = next.value;
        self.is_valid &= next.is_valid;
        self.was_transformed |= next.was_transformed;
        self.errors.extend(next.errors);
        self.warnings.extend(next.warnings);
        self
    }
}

pub fn sanitize(raw: &Value, param_type: &ParamType, opts: &ProcessOptions) -> ProcessResult {
    match param_type {
        ParamType::Address => address::sanitize(raw, opts),
        ParamType::UFix64 => fixed_point::sanitize(raw),
        ParamType::Int => integer::sanitize(raw, true),
        ParamType::UInt64 => integer::sanitize(raw, false),
        ParamType::Bool => boolean::sanitize(raw),
        ParamType::String => text::sanitize(raw, opts),
        ParamType::Array(_) => collection::sanitize_list(raw),
        ParamType::Dictionary(_) => collection::sanitize_map(raw),
        ParamType::Custom(_) => ProcessResult::unchanged(raw.clone()),
    }
}

pub fn convert(value: &Value, param_type: &ParamType) -> ProcessResult {
    match param_type {
        ParamType::Address => address::convert(value),
        ParamType::UFix64 => fixed_point::convert(value),
        ParamType::Int => integer::convert_signed(value),
        ParamType::UInt64 => integer::convert_unsigned(value),
        ParamType::Bool => boolean::convert(value),
        ParamType::String => text::convert(value),
        ParamType::Array(_) => collection::convert_list(value),
        ParamType::Dictionary(_) => collection::convert_map(value),
        ParamType::Custom(_) => ProcessResult::unchanged(value.clone()),
    }
}

pub fn validate_format(value: &Value, param_type: &ParamType) -> ProcessResult {
    if is_empty_value(value) {
        return ProcessResult::unchanged(value.clone());
    }
    match param_type {
        ParamType::Address => address::validate(value),
        ParamType::UFix64 => fixed_point::validate(value),
        ParamType::Int => integer::validate_signed(value),
        ParamType::UInt64 => integer::validate_unsigned(value),
        ParamType::Bool => boolean::validate(value),
        ParamType::String => text::validate(value),
        ParamType::Array(element) => collection::validate_list(value, element.as_deref()),
        ParamType::Dictionary(entry) => collection::validate_map(
            value,
            entry.as_ref().map(|(_, v)| v.as_ref()),
        ),
        ParamType::Custom(_) => ProcessResult::unchanged(value.clone()),
    }
}

/// Sanitize → convert → validate. Empty values are valid here; whether a
/// parameter is required is decided by the data-flow validator.
pub fn process_value(raw: &Value, param_type: &ParamType, opts: &ProcessOptions) -> ProcessResult {
    if is_empty_value(raw) {
        return ProcessResult::unchanged(raw.clone());
    }

    let sanitized = sanitize(raw, param_type, opts);
    if is_empty_value(&sanitized.value) {
        return sanitized;
    }

    let converted = convert(&sanitized.value, param_type);
    if !converted.is_valid {
        return sanitized.then(converted);
    }

    let validated = validate_format(&converted.value, param_type);
    sanitized.then(converted).then(validated)
}
