//! Array (`[T]`) and Dictionary (`{K: V}`) parameters.

use serde_json::{Map, Value};

use super::address::json_kind;
use super::{ProcessOptions, ProcessResult, process_value};
use crate::error::ErrorKind;
use crate::parse::types::ParamType;

/// Native arrays pass through. Strings are parsed as JSON when bracketed,
/// otherwise split on commas.
pub fn sanitize_list(raw: &Value) -> ProcessResult {
    let Some(s) = raw.as_str() else {
        return ProcessResult::unchanged(raw.clone());
    };

    let trimmed = s.trim();
    if trimmed.starts_with('[') {
        if let Ok(parsed @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed) {
            return ProcessResult::transformed(parsed);
        }
        let inner = trimmed
            .trim_start_matches('[')
            .trim_end_matches(']');
        return ProcessResult::transformed(split_items(inner))
            .with_warning("Could not parse list as JSON; split on commas instead");
    }

    ProcessResult::transformed(split_items(trimmed))
}

/// Native objects pass through. Strings must be a JSON object; anything
/// else degrades to an empty map with a warning.
pub fn sanitize_map(raw: &Value) -> ProcessResult {
    let Some(s) = raw.as_str() else {
        return ProcessResult::unchanged(raw.clone());
    };

    match serde_json::from_str::<Value>(s.trim()) {
        Ok(parsed @ Value::Object(_)) => ProcessResult::transformed(parsed),
        _ => ProcessResult::transformed(Value::Object(Map::new()))
            .with_warning("Could not parse dictionary; using an empty dictionary"),
    }
}

pub fn convert_list(value: &Value) -> ProcessResult {
    match value {
        Value::Array(_) => ProcessResult::unchanged(value.clone()),
        Value::String(_) => sanitize_list(value),
        other => ProcessResult::invalid(
            other.clone(),
            ErrorKind::InvalidType,
            format!("Array must be a list, got {}", json_kind(other)),
        ),
    }
}

pub fn convert_map(value: &Value) -> ProcessResult {
    match value {
        Value::Object(_) => ProcessResult::unchanged(value.clone()),
        Value::String(_) => sanitize_map(value),
        other => ProcessResult::invalid(
            other.clone(),
            ErrorKind::InvalidType,
            format!("Dictionary must be an object, got {}", json_kind(other)),
        ),
    }
}

/// Shape check plus per-element processing when the element type is known.
pub fn validate_list(value: &Value, element: Option<&ParamType>) -> ProcessResult {
    let Value::Array(items) = value else {
        return ProcessResult::invalid(
            value.clone(),
            ErrorKind::InvalidType,
            format!("Array must be a list, got {}", json_kind(value)),
        );
    };

    let mut result = ProcessResult::unchanged(value.clone());
    if let Some(element) = element {
        for (i, item) in items.iter().enumerate() {
            result = merge_element(result, &format!("[{}]", i), item, element);
        }
    }
    result
}

pub fn validate_map(value: &Value, value_type: Option<&ParamType>) -> ProcessResult {
    let Value::Object(entries) = value else {
        return ProcessResult::invalid(
            value.clone(),
            ErrorKind::InvalidType,
            format!("Dictionary must be an object, got {}", json_kind(value)),
        );
    };

    let mut result = ProcessResult::unchanged(value.clone());
    if let Some(value_type) = value_type {
        for (key, item) in entries {
            result = merge_element(result, &format!("[\"{}\"]", key), item, value_type);
        }
    }
    result
}

/// Element findings are prefixed with their position; the element's own
/// sanitized value does not replace the container.
fn merge_element(result: ProcessResult, path: &str, item: &Value, element: &ParamType) -> ProcessResult {
    let processed = process_value(item, element, &ProcessOptions { auto_correct: false });
    let mut result = result;
    for issue in processed.errors {
        result = result.with_error(issue.kind, format!("{}: {}", path, issue.message));
    }
    for warning in processed.warnings {
        result = result.with_warning(format!("{}: {}", path, warning));
    }
    result
}

fn split_items(s: &str) -> Value {
    Value::Array(
        s.split(',')
            .map(|item| item.trim().trim_matches('"').trim())
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_from_json_string() {
        let result = sanitize_list(&json!("[1, 2, 3]"));
        assert_eq!(result.value, json!([1, 2, 3]));
        assert!(result.was_transformed);
    }

    #[test]
    fn list_falls_back_to_delimiter_split() {
        assert_eq!(sanitize_list(&json!("a, b ,c")).value, json!(["a", "b", "c"]));

        let broken = sanitize_list(&json!("[0x01, 0x02"));
        assert_eq!(broken.value, json!(["0x01", "0x02"]));
        assert_eq!(broken.warnings.len(), 1);
    }

    #[test]
    fn unparseable_map_becomes_empty_with_warning() {
        let result = sanitize_map(&json!("{not json"));
        assert!(result.is_valid);
        assert_eq!(result.value, json!({}));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn native_map_passes_through() {
        let result = sanitize_map(&json!({"a": 1}));
        assert!(!result.was_transformed);
        assert!(validate_map(&result.value, None).is_valid);
    }

    #[test]
    fn element_errors_are_prefixed() {
        let result = validate_list(&json!(["1.0", "-2"]), Some(&ParamType::UFix64));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.starts_with("[1]: "));
        assert_eq!(result.errors[0].kind, ErrorKind::OutOfRange);
    }

    #[test]
    fn map_values_are_checked() {
        let result = validate_map(&json!({"alice": "0x01"}), Some(&ParamType::Address));
        assert_eq!(result.errors[0].kind, ErrorKind::PatternMismatch);
        assert!(result.errors[0].message.starts_with("[\"alice\"]: "));
    }

    #[test]
    fn wrong_shape_is_type_error() {
        assert_eq!(convert_list(&json!(5)).errors[0].kind, ErrorKind::InvalidType);
    }
}
