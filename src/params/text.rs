//! `String`: control-character cleanup and line-ending normalization.

use serde_json::Value;

use super::{ProcessOptions, ProcessResult};
use crate::error::ErrorKind;

const ZERO_WIDTH: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

pub fn sanitize(raw: &Value, opts: &ProcessOptions) -> ProcessResult {
    let (s, coerced) = match raw {
        Value::String(s) => (s.clone(), false),
        other => (coerce(other), true),
    };

    let mut cleaned = normalize_line_endings(&s);
    if opts.auto_correct {
        cleaned = cleaned
            .chars()
            .filter(|c| !is_stripped(*c))
            .collect();
    }

    let result = ProcessResult::transformed_if(Value::String(cleaned), raw);
    if coerced {
        result.with_warning(coercion_warning(raw))
    } else {
        result
    }
}

pub fn convert(value: &Value) -> ProcessResult {
    match value {
        Value::String(_) => ProcessResult::unchanged(value.clone()),
        other => ProcessResult::transformed(Value::String(coerce(other)))
            .with_warning(coercion_warning(other)),
    }
}

pub fn validate(value: &Value) -> ProcessResult {
    let Some(s) = value.as_str() else {
        return ProcessResult::unchanged(value.clone()).with_warning(coercion_warning(value));
    };
    if s.contains('\0') {
        return ProcessResult::invalid(
            value.clone(),
            ErrorKind::InvalidFormat,
            "String must not contain null characters",
        );
    }
    ProcessResult::unchanged(value.clone())
}

/// `\r\n`, `\r`, NEL and the Unicode line/paragraph separators become `\n`.
pub fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
        .replace(['\r', '\u{0085}', '\u{2028}', '\u{2029}'], "\n")
}

fn is_stripped(c: char) -> bool {
    (c.is_control() && c != '\n' && c != '\t') || ZERO_WIDTH.contains(&c)
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn coercion_warning(value: &Value) -> String {
    format!("Converted {} to string", super::address::json_kind(value))
}
