//! `Address`: `0x` followed by exactly 16 lowercase hex digits.

use serde_json::Value;

use super::{ProcessOptions, ProcessResult};
use crate::error::ErrorKind;

pub const ADDRESS_HEX_DIGITS: usize = 16;
pub const ADDRESS_LENGTH: usize = ADDRESS_HEX_DIGITS + 2;

pub fn sanitize(raw: &Value, opts: &ProcessOptions) -> ProcessResult {
    let Some(s) = raw.as_str() else {
        return ProcessResult::unchanged(raw.clone());
    };

    let lowered = s.trim().to_ascii_lowercase();
    let (has_prefix, body) = match lowered.strip_prefix("0x") {
        Some(rest) => (true, rest.to_string()),
        None => (false, lowered.clone()),
    };

    let mut warnings = Vec::new();
    let body = if opts.auto_correct && !body.chars().all(is_lower_hex) {
        warnings.push("Removed non-hexadecimal characters from address".to_string());
        body.chars().filter(|c| is_lower_hex(*c)).collect()
    } else {
        body
    };

    // Only complete addresses get a prefix; partial input is mid-typing.
    let sanitized = if has_prefix || body.len() == ADDRESS_HEX_DIGITS {
        format!("0x{}", body)
    } else {
        body
    };

    let mut result = ProcessResult::transformed_if(Value::String(sanitized), raw);
    for warning in warnings {
        result = result.with_warning(warning);
    }
    result
}

pub fn convert(value: &Value) -> ProcessResult {
    match value {
        Value::String(_) => ProcessResult::unchanged(value.clone()),
        other => ProcessResult::invalid(
            other.clone(),
            ErrorKind::InvalidType,
            format!("Address must be a string, got {}", json_kind(other)),
        ),
    }
}

pub fn validate(value: &Value) -> ProcessResult {
    let Some(s) = value.as_str() else {
        return convert(value);
    };

    let result = ProcessResult::unchanged(value.clone());
    if s.len() != ADDRESS_LENGTH {
        return result.with_error(
            ErrorKind::PatternMismatch,
            format!(
                "Address must be {} characters (0x + {} hex digits), got {}",
                ADDRESS_LENGTH,
                ADDRESS_HEX_DIGITS,
                s.len()
            ),
        );
    }
    let Some(body) = s.strip_prefix("0x") else {
        return result.with_error(ErrorKind::PatternMismatch, "Address must start with 0x");
    };
    if !body.chars().all(is_lower_hex) {
        return result.with_error(
            ErrorKind::PatternMismatch,
            "Address must contain only lowercase hexadecimal characters after 0x",
        );
    }
    result
}

pub fn is_lower_hex(c: char) -> bool {
    c.is_ascii_digit() || ('a'..='f').contains(&c)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts() -> ProcessOptions {
        ProcessOptions::default()
    }

    #[test]
    fn complete_digits_get_prefix() {
        let result = sanitize(&json!("1234567890abcdef"), &opts());
        assert_eq!(result.value, json!("0x1234567890abcdef"));
        assert!(result.was_transformed);
    }

    #[test]
    fn partial_input_is_left_alone() {
        let result = sanitize(&json!("123456"), &opts());
        assert_eq!(result.value, json!("123456"));
        assert!(!result.was_transformed);
    }

    #[test]
    fn non_hex_characters_are_stripped_with_auto_correct() {
        let result = sanitize(&json!("0x12zz34"), &opts());
        assert_eq!(result.value, json!("0x1234"));
        assert_eq!(result.warnings.len(), 1);

        let strict = sanitize(&json!("0x12zz34"), &ProcessOptions { auto_correct: false });
        assert_eq!(strict.value, json!("0x12zz34"));
    }

    #[test]
    fn validate_checks_length_prefix_and_digits() {
        assert!(validate(&json!("0x1234567890abcdef")).is_valid);

        let short = validate(&json!("0x1234"));
        assert_eq!(short.errors[0].kind, ErrorKind::PatternMismatch);

        let no_prefix = validate(&json!("001234567890abcdef"));
        assert_eq!(no_prefix.errors[0].kind, ErrorKind::PatternMismatch);

        let upper = validate(&json!("0x1234567890ABCDEF"));
        assert!(!upper.is_valid);
    }

    #[test]
    fn non_string_is_a_type_error() {
        let result = validate(&json!(12345));
        assert_eq!(result.errors[0].kind, ErrorKind::InvalidType);
    }
}
