//! `Int` (signed) and `UInt64`.

use std::num::IntErrorKind;

use serde_json::Value;

use super::ProcessResult;
use super::address::json_kind;
use super::fixed_point::keep_single_decimal_point;
use crate::error::ErrorKind;

/// Keep digits, a leading minus (signed only) and one decimal point; strip
/// leading zeros. Decimal points survive so conversion can reject fractions.
pub fn sanitize(raw: &Value, signed: bool) -> ProcessResult {
    let Some(s) = raw.as_str() else {
        return ProcessResult::unchanged(raw.clone());
    };

    let trimmed = s.trim();
    let negative = trimmed.starts_with('-');
    let Some(digits) = keep_single_decimal_point(trimmed) else {
        return ProcessResult::unchanged(raw.clone());
    };
    let digits = strip_leading_zeros(&digits);

    let (sanitized, dropped_sign) = match (negative, signed) {
        (true, true) if digits != "0" => (format!("-{}", digits), false),
        (true, false) => (digits, true),
        _ => (digits, false),
    };

    let result = ProcessResult::transformed_if(Value::String(sanitized), raw);
    if dropped_sign {
        result.with_warning("Removed leading minus: UInt64 cannot be negative")
    } else {
        result
    }
}

pub fn convert_signed(value: &Value) -> ProcessResult {
    match value {
        Value::Number(n) => {
            if n.is_i64() {
                return ProcessResult::unchanged(value.clone());
            }
            if n.is_u64() {
                return out_of_range(value, "Int value exceeds the 64-bit range");
            }
            whole_float(value, n.as_f64(), |f| {
                if f < i64::MIN as f64 || f >= i64::MAX as f64 {
                    None
                } else {
                    Some(Value::from(f as i64))
                }
            })
        }
        Value::String(s) => {
            let Some(digits) = whole_digits(s.trim()) else {
                return fractional(value);
            };
            match digits.parse::<i64>() {
                Ok(i) => ProcessResult::transformed(Value::from(i)),
                Err(e) => parse_failure(value, e.kind(), "Int"),
            }
        }
        other => not_an_integer(other, "Int"),
    }
}

pub fn convert_unsigned(value: &Value) -> ProcessResult {
    match value {
        Value::Number(n) => {
            if n.is_u64() {
                return ProcessResult::unchanged(value.clone());
            }
            if n.is_i64() {
                return out_of_range(value, "UInt64 cannot be negative");
            }
            whole_float(value, n.as_f64(), |f| {
                if f < 0.0 || f >= u64::MAX as f64 {
                    None
                } else {
                    Some(Value::from(f as u64))
                }
            })
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('-') && trimmed.chars().any(|c| matches!(c, '1'..='9')) {
                return out_of_range(value, "UInt64 cannot be negative");
            }
            let Some(digits) = whole_digits(trimmed.trim_start_matches('-')) else {
                return fractional(value);
            };
            match digits.parse::<u64>() {
                Ok(u) => ProcessResult::transformed(Value::from(u)),
                Err(e) => parse_failure(value, e.kind(), "UInt64"),
            }
        }
        other => not_an_integer(other, "UInt64"),
    }
}

pub fn validate_signed(value: &Value) -> ProcessResult {
    match value {
        Value::Number(n) if n.is_i64() => ProcessResult::unchanged(value.clone()),
        _ => without_transform(convert_signed(value), value),
    }
}

pub fn validate_unsigned(value: &Value) -> ProcessResult {
    match value {
        Value::Number(n) if n.is_u64() => ProcessResult::unchanged(value.clone()),
        _ => without_transform(convert_unsigned(value), value),
    }
}

/// Validation reports findings only; it never replaces the value.
fn without_transform(result: ProcessResult, original: &Value) -> ProcessResult {
    ProcessResult {
        value: original.clone(),
        was_transformed: false,
        ..result
    }
}

/// `"12"`, `"12."` and `"12.000"` are whole; `"12.5"` is not.
fn whole_digits(s: &str) -> Option<&str> {
    match s.split_once('.') {
        Some((int, frac)) if frac.chars().all(|c| c == '0') => Some(int),
        Some(_) => None,
        None => Some(s),
    }
}

fn strip_leading_zeros(s: &str) -> String {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    let int = int.trim_start_matches('0');
    let int = if int.is_empty() { "0" } else { int };
    match frac {
        Some(frac) => format!("{}.{}", int, frac),
        None => int.to_string(),
    }
}

fn whole_float(
    value: &Value,
    f: Option<f64>,
    to_value: impl Fn(f64) -> Option<Value>,
) -> ProcessResult {
    let Some(f) = f else {
        return not_an_integer(value, "integer");
    };
    if f.fract() != 0.0 {
        return fractional(value);
    }
    match to_value(f) {
        Some(v) => ProcessResult::transformed(v),
        None => out_of_range(value, "Integer value is out of range"),
    }
}

fn parse_failure(value: &Value, kind: &IntErrorKind, type_name: &str) -> ProcessResult {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            out_of_range(value, &format!("{} value is out of range", type_name))
        }
        _ => ProcessResult::invalid(
            value.clone(),
            ErrorKind::InvalidType,
            format!("'{}' is not a valid {}", display(value), type_name),
        ),
    }
}

fn out_of_range(value: &Value, message: &str) -> ProcessResult {
    ProcessResult::invalid(value.clone(), ErrorKind::OutOfRange, message)
}

fn fractional(value: &Value) -> ProcessResult {
    ProcessResult::invalid(
        value.clone(),
        ErrorKind::InvalidType,
        format!("'{}' is not a whole number", display(value)),
    )
}

fn not_an_integer(value: &Value, type_name: &str) -> ProcessResult {
    ProcessResult::invalid(
        value.clone(),
        ErrorKind::InvalidType,
        format!("{} must be a number or numeric string, got {}", type_name, json_kind(value)),
    )
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
