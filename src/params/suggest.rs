//! Autocomplete-style corrections for partially typed values.

use serde::{Deserialize, Serialize};

use super::address::{ADDRESS_HEX_DIGITS, is_lower_hex};
use super::boolean::{FALSE_SYNONYMS, TRUE_SYNONYMS};
use super::fixed_point::MAX_FRACTIONAL_DIGITS;
use crate::parse::types::ParamType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub value: String,
    pub description: String,
}

impl Suggestion {
    fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        Suggestion {
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Candidate replacements for `raw`, most specific first, never including
/// `raw` itself.
pub fn suggest_corrections(raw: &str, param_type: &ParamType) -> Vec<Suggestion> {
    let mut suggestions = match param_type {
        ParamType::Address => address(raw),
        ParamType::UFix64 => fixed_point(raw),
        ParamType::Int => integer(raw, true),
        ParamType::UInt64 => integer(raw, false),
        ParamType::Bool => boolean(raw),
        ParamType::Array(_) => list(raw),
        ParamType::String if raw.trim() != raw => {
            vec![Suggestion::new(raw.trim(), "Remove surrounding whitespace")]
        }
        _ => vec![],
    };

    let mut seen = std::collections::HashSet::new();
    suggestions.retain(|s| s.value != raw && seen.insert(s.value.clone()));
    suggestions
}

fn address(raw: &str) -> Vec<Suggestion> {
    let lowered = raw.trim().to_ascii_lowercase();
    let body = lowered.strip_prefix("0x").unwrap_or(&lowered);
    let hex: String = body.chars().filter(|c| is_lower_hex(*c)).collect();

    let mut out = Vec::new();
    if hex.is_empty() {
        return out;
    }
    if hex.len() != body.len() {
        out.push(Suggestion::new(
            format!("0x{}", hex),
            "Remove non-hexadecimal characters",
        ));
    }
    match hex.len().cmp(&ADDRESS_HEX_DIGITS) {
        std::cmp::Ordering::Equal => {
            out.insert(0, Suggestion::new(format!("0x{}", hex), "Use canonical address form"));
        }
        std::cmp::Ordering::Less => out.push(Suggestion::new(
            format!("0x{:0>width$}", hex, width = ADDRESS_HEX_DIGITS),
            format!("Pad with leading zeros to {} hex digits", ADDRESS_HEX_DIGITS),
        )),
        std::cmp::Ordering::Greater => out.push(Suggestion::new(
            format!("0x{}", &hex[hex.len() - ADDRESS_HEX_DIGITS..]),
            format!("Keep the last {} hex digits", ADDRESS_HEX_DIGITS),
        )),
    }
    out
}

fn fixed_point(raw: &str) -> Vec<Suggestion> {
    let trimmed = raw.trim();
    let mut out = Vec::new();

    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        let replaced = trimmed.replace(',', ".");
        out.push(Suggestion::new(replaced.clone(), "Use '.' as the decimal separator"));
        replaced
    } else {
        trimmed.to_string()
    };

    if let Some(stripped) = normalized.strip_prefix('-') {
        out.push(Suggestion::new(stripped, "UFix64 cannot be negative"));
    }

    match normalized.split_once('.') {
        Some((int, frac))
            if frac.len() > MAX_FRACTIONAL_DIGITS && frac.bytes().all(|b| b.is_ascii_digit()) =>
        {
            out.push(Suggestion::new(
                format!("{}.{}", int, &frac[..MAX_FRACTIONAL_DIGITS]),
                format!("Truncate to {} decimal places", MAX_FRACTIONAL_DIGITS),
            ))
        }
        None if !normalized.is_empty() && normalized.chars().all(|c| c.is_ascii_digit()) => {
            out.push(Suggestion::new(format!("{}.0", normalized), "Add a decimal point"))
        }
        _ => {}
    }
    out
}

fn integer(raw: &str, signed: bool) -> Vec<Suggestion> {
    let trimmed = raw.trim();
    let mut out = Vec::new();

    let unsigned = trimmed.strip_prefix('-');
    if let (Some(abs), false) = (unsigned, signed) {
        out.push(Suggestion::new(abs, "UInt64 cannot be negative"));
    }

    if let Some((int, _)) = trimmed.split_once('.') {
        let int = if !signed { int.trim_start_matches('-') } else { int };
        if !int.is_empty() && int != "-" {
            out.push(Suggestion::new(int, "Drop the fractional part"));
        }
    }
    out
}

fn boolean(raw: &str) -> Vec<Suggestion> {
    let token = raw.trim().to_ascii_lowercase();
    if token.is_empty() {
        return vec![
            Suggestion::new("true", "Boolean true"),
            Suggestion::new("false", "Boolean false"),
        ];
    }

    let mut out = Vec::new();
    if TRUE_SYNONYMS.iter().any(|s| s.starts_with(token.as_str())) {
        out.push(Suggestion::new("true", "Boolean true"));
    }
    if FALSE_SYNONYMS.iter().any(|s| s.starts_with(token.as_str())) {
        out.push(Suggestion::new("false", "Boolean false"));
    }
    out
}

fn list(raw: &str) -> Vec<Suggestion> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('[') {
        return vec![];
    }
    let items: Vec<String> = trimmed
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| serde_json::Value::String(s.to_string()).to_string())
        .collect();
    vec![Suggestion::new(
        format!("[{}]", items.join(", ")),
        "Wrap as a list",
    )]
}
