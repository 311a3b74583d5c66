//! `Bool`, with case-insensitive textual synonyms.

use serde_json::Value;

use super::ProcessResult;
use super::address::json_kind;
use crate::error::ErrorKind;

pub const TRUE_SYNONYMS: [&str; 5] = ["true", "1", "yes", "on", "enabled"];
pub const FALSE_SYNONYMS: [&str; 5] = ["false", "0", "no", "off", "disabled"];

pub fn parse_synonym(s: &str) -> Option<bool> {
    let token = s.trim().to_ascii_lowercase();
    if TRUE_SYNONYMS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_SYNONYMS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Recognized tokens become native booleans; anything else is left for
/// validation to reject.
pub fn sanitize(raw: &Value) -> ProcessResult {
    match raw.as_str().and_then(parse_synonym) {
        Some(b) => ProcessResult::transformed(Value::Bool(b)),
        None => ProcessResult::unchanged(raw.clone()),
    }
}

pub fn convert(value: &Value) -> ProcessResult {
    match value {
        Value::Bool(_) => ProcessResult::unchanged(value.clone()),
        Value::String(s) => match parse_synonym(s) {
            Some(b) => ProcessResult::transformed(Value::Bool(b)),
            None => ProcessResult::invalid(
                value.clone(),
                ErrorKind::InvalidType,
                format!("'{}' is not a recognized boolean (use true/false)", s),
            ),
        },
        other => ProcessResult::invalid(
            other.clone(),
            ErrorKind::InvalidType,
            format!("Bool must be true or false, got {}", json_kind(other)),
        ),
    }
}

pub fn validate(value: &Value) -> ProcessResult {
    match value {
        Value::Bool(_) => ProcessResult::unchanged(value.clone()),
        other => ProcessResult::invalid(
            other.clone(),
            ErrorKind::InvalidType,
            format!("Bool must be a boolean value, got {}", json_kind(other)),
        ),
    }
}
