//! Input types for the validation engine.
//!
//! These are the serde targets for the builder's workflow JSON, the action
//! metadata catalog, and the user-entered parameter values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// TOP-LEVEL WORKFLOW
// =============================================================================

/// Raw action graph as produced by the graph source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Target network, e.g. `testnet`. Checked against metadata network lists.
    #[serde(default)]
    pub network: Option<String>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    /// Key into the metadata catalog.
    pub action_type: String,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
    /// Outgoing graph edges.
    #[serde(default)]
    pub next_actions: Vec<String>,
}

impl Action {
    pub fn parameter(&self, name: &str) -> Option<&ActionParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub required: bool,
}

// =============================================================================
// METADATA CATALOG
// =============================================================================

/// `actionType` → metadata. Read-only truth for validation.
pub type MetadataCatalog = BTreeMap<String, ActionMetadata>;

/// `actionId` → parameter name → raw value.
pub type ParameterValues = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMetadata {
    #[serde(default)]
    pub inputs: Vec<FieldSpec>,
    #[serde(default)]
    pub outputs: Vec<FieldSpec>,
    #[serde(default)]
    pub gas_estimate: u64,
    /// Empty means "any network".
    #[serde(default)]
    pub supported_networks: Vec<String>,
    #[serde(default)]
    pub required_capabilities: Vec<String>,
}

impl ActionMetadata {
    pub fn input(&self, name: &str) -> Option<&FieldSpec> {
        self.inputs.iter().find(|f| f.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&FieldSpec> {
        self.outputs.iter().find(|f| f.name == name)
    }

    pub fn supports_network(&self, network: &str) -> bool {
        self.supported_networks.is_empty()
            || self.supported_networks.iter().any(|n| n.eq_ignore_ascii_case(network))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
}

// =============================================================================
// PARAMETER TYPES
// =============================================================================

/// Declared parameter type, written in the target chain's type syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    Address,
    UFix64,
    Int,
    UInt64,
    Bool,
    String,
    /// `[T]`; `None` when declared as a bare `Array`.
    Array(Option<Box<ParamType>>),
    /// `{K: V}`; `None` when declared as a bare `Dictionary`.
    Dictionary(Option<(Box<ParamType>, Box<ParamType>)>),
    Custom(String),
}

/// Deepest container nesting `ParamType::parse` will descend into; anything
/// deeper is kept as `Custom`.
pub const MAX_TYPE_NESTING: usize = 32;

impl ParamType {
    pub fn parse(raw: &str) -> ParamType {
        Self::parse_nested(raw, 0)
    }

    fn parse_nested(raw: &str, depth: usize) -> ParamType {
        let trimmed = raw.trim();
        match trimmed {
            "Address" => return ParamType::Address,
            "UFix64" => return ParamType::UFix64,
            "Int" => return ParamType::Int,
            "UInt64" => return ParamType::UInt64,
            "Bool" | "Boolean" => return ParamType::Bool,
            "String" => return ParamType::String,
            "Array" => return ParamType::Array(None),
            "Dictionary" => return ParamType::Dictionary(None),
            _ => {}
        }

        if depth >= MAX_TYPE_NESTING {
            return ParamType::Custom(trimmed.to_string());
        }

        if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return ParamType::Array(Some(Box::new(Self::parse_nested(inner, depth + 1))));
        }

        if let Some(inner) = trimmed.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if let Some((key, value)) = split_top_level_colon(inner) {
                return ParamType::Dictionary(Some((
                    Box::new(Self::parse_nested(key, depth + 1)),
                    Box::new(Self::parse_nested(value, depth + 1)),
                )));
            }
        }

        ParamType::Custom(trimmed.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ParamType::UFix64 | ParamType::Int | ParamType::UInt64)
    }
}

/// Split `K: V` on the first colon that is not nested inside brackets.
fn split_top_level_colon(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            ':' if depth == 0 => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Address => f.write_str("Address"),
            ParamType::UFix64 => f.write_str("UFix64"),
            ParamType::Int => f.write_str("Int"),
            ParamType::UInt64 => f.write_str("UInt64"),
            ParamType::Bool => f.write_str("Bool"),
            ParamType::String => f.write_str("String"),
            ParamType::Array(None) => f.write_str("Array"),
            ParamType::Array(Some(inner)) => write!(f, "[{}]", inner),
            ParamType::Dictionary(None) => f.write_str("Dictionary"),
            ParamType::Dictionary(Some((k, v))) => write!(f, "{{{}: {}}}", k, v),
            ParamType::Custom(name) => f.write_str(name),
        }
    }
}

impl From<String> for ParamType {
    fn from(s: String) -> Self {
        ParamType::parse(&s)
    }
}

impl From<ParamType> for String {
    fn from(t: ParamType) -> Self {
        t.to_string()
    }
}
