//! Split raw parameter values into literals and `actionId.outputName` references.
//!
//! This runs once, before any type processing, so later phases never have to
//! re-detect whether a string is a reference.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueReference {
    pub source_action_id: String,
    pub output_name: String,
}

impl std::fmt::Display for ValueReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.source_action_id, self.output_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Literal(Value),
    Reference(ValueReference),
}

impl ParameterValue {
    pub fn parse(raw: &Value) -> ParameterValue {
        match raw.as_str().and_then(parse_reference) {
            Some(reference) => ParameterValue::Reference(reference),
            None => ParameterValue::Literal(raw.clone()),
        }
    }

    pub fn as_reference(&self) -> Option<&ValueReference> {
        match self {
            ParameterValue::Reference(r) => Some(r),
            ParameterValue::Literal(_) => None,
        }
    }

    /// Null, empty and whitespace-only strings count as "not set".
    pub fn is_empty(&self) -> bool {
        match self {
            ParameterValue::Literal(v) => is_empty_value(v),
            ParameterValue::Reference(_) => false,
        }
    }
}

pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Parse `<actionId>.<outputName>`.
///
/// The action id must start with a letter or underscore and may contain
/// letters, digits, `_` and `-`; the output name is an identifier. Numbers
/// such as `12.5` and addresses such as `0xabc` therefore stay literals.
pub fn parse_reference(s: &str) -> Option<ValueReference> {
    let trimmed = s.trim();
    let (action_id, output_name) = trimmed.split_once('.')?;

    if !is_action_id(action_id) || !is_identifier(output_name) {
        return None;
    }

    Some(ValueReference {
        source_action_id: action_id.to_string(),
        output_name: output_name.to_string(),
    })
}

fn is_action_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
