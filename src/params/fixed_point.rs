//! `UFix64`: unsigned fixed-point with 8 fractional digits.

use serde_json::{Number, Value};

use super::ProcessResult;
use super::address::json_kind;
use crate::error::ErrorKind;

pub const MAX_FRACTIONAL_DIGITS: usize = 8;

/// Largest representable UFix64 (`u64::MAX / 10^8`).
pub const UFIX64_MAX: f64 = 184_467_440_737.095_516_15;

pub fn sanitize(raw: &Value) -> ProcessResult {
    let Some(s) = raw.as_str() else {
        return ProcessResult::unchanged(raw.clone());
    };

    let trimmed = s.trim();
    let negative = trimmed.starts_with('-');
    let Some(cleaned) = keep_single_decimal_point(trimmed) else {
        return ProcessResult::unchanged(raw.clone());
    };

    let (cleaned, truncated) = truncate_fraction(&cleaned);
    // Sign is kept so conversion reports it instead of silently dropping it.
    let sanitized = if negative { format!("-{}", cleaned) } else { cleaned };

    let result = ProcessResult::transformed_if(Value::String(sanitized), raw);
    if truncated {
        result.with_warning(precision_warning())
    } else {
        result
    }
}

pub fn convert(value: &Value) -> ProcessResult {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => check_range(f, value.clone()),
            None => ProcessResult::invalid(value.clone(), ErrorKind::InvalidType, "Not a number"),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            let (digits, truncated) = truncate_fraction(trimmed);
            let Ok(parsed) = digits.parse::<f64>() else {
                return ProcessResult::invalid(
                    value.clone(),
                    ErrorKind::InvalidType,
                    format!("'{}' is not a valid decimal number", trimmed),
                );
            };
            if !parsed.is_finite() {
                return ProcessResult::invalid(
                    value.clone(),
                    ErrorKind::InvalidType,
                    format!("'{}' is not a valid decimal number", trimmed),
                );
            }

            let range = check_range(parsed, value.clone());
            if !range.is_valid {
                return range;
            }

            let Some(number) = Number::from_f64(parsed) else {
                return ProcessResult::invalid(value.clone(), ErrorKind::InvalidType, "Not a number");
            };
            let result = ProcessResult::transformed(Value::Number(number));
            if truncated {
                result.with_warning(precision_warning())
            } else {
                result
            }
        }
        other => ProcessResult::invalid(
            other.clone(),
            ErrorKind::InvalidType,
            format!("UFix64 must be a number or numeric string, got {}", json_kind(other)),
        ),
    }
}

pub fn validate(value: &Value) -> ProcessResult {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(f) = f else {
        return convert(value);
    };

    let result = check_range(f, value.clone());
    if !result.is_valid {
        return result;
    }

    let rendered = match value {
        Value::String(s) => s.trim().to_string(),
        _ => f.to_string(),
    };
    if fractional_digits(&rendered) > MAX_FRACTIONAL_DIGITS {
        result.with_warning(precision_warning())
    } else {
        result
    }
}

fn check_range(f: f64, value: Value) -> ProcessResult {
    if f < 0.0 {
        return ProcessResult::invalid(
            value,
            ErrorKind::OutOfRange,
            "UFix64 cannot be negative",
        );
    }
    if f > UFIX64_MAX {
        return ProcessResult::invalid(
            value,
            ErrorKind::OutOfRange,
            format!("UFix64 cannot exceed {}", UFIX64_MAX),
        );
    }
    ProcessResult::unchanged(value)
}

fn precision_warning() -> String {
    format!(
        "Precision truncated to {} decimal places",
        MAX_FRACTIONAL_DIGITS
    )
}

/// Keep digits and the first decimal point; digits after later points are
/// merged into the fraction. `None` if no digit survives.
pub(crate) fn keep_single_decimal_point(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut seen_point = false;
    for c in s.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '.' && !seen_point {
            seen_point = true;
            out.push(c);
        }
    }
    if out.chars().any(|c| c.is_ascii_digit()) {
        Some(out)
    } else {
        None
    }
}

fn truncate_fraction(s: &str) -> (String, bool) {
    match s.split_once('.') {
        Some((int, frac)) if frac.chars().count() > MAX_FRACTIONAL_DIGITS => {
            let kept: String = frac.chars().take(MAX_FRACTIONAL_DIGITS).collect();
            (format!("{}.{}", int, kept), true)
        }
        _ => (s.to_string(), false),
    }
}

fn fractional_digits(s: &str) -> usize {
    s.split_once('.').map(|(_, frac)| frac.chars().count()).unwrap_or(0)
}
