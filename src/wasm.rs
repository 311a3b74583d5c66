//! WASM entry points for the browser presentation layer.
//!
//! Inputs arrive as JSON strings. Every call returns a `status`-tagged object
//! so malformed input surfaces as a message instead of a thrown exception.

use std::sync::LazyLock;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::params::{ProcessOptions, ProcessResult, Suggestion, process_value, suggest_corrections};
use crate::parse::types::{MetadataCatalog, ParamType, ParameterValues};
use crate::readiness::{ExecutionValidation, QuickCheck, ValidationEngine};

static ENGINE: LazyLock<ValidationEngine> = LazyLock::new(|| ValidationEngine::new(EngineConfig::default()));

/// Full readiness report for `(workflow, metadata, parameter values)`.
#[wasm_bindgen]
pub fn validate_for_execution(workflow_json: &str, catalog_json: &str, values_json: &str) -> JsValue {
    to_js(&Response::from(validate_for_execution_inner(
        &ENGINE,
        workflow_json,
        catalog_json,
        values_json,
    )))
}

fn validate_for_execution_inner(
    engine: &ValidationEngine,
    workflow_json: &str,
    catalog_json: &str,
    values_json: &str,
) -> Result<ExecutionValidation, EngineError> {
    let (workflow, catalog, values) = parse_inputs(workflow_json, catalog_json, values_json)?;
    let result = engine.validate_for_execution(&workflow, &catalog, &values);
    Ok((*result).clone())
}

#[wasm_bindgen]
pub fn quick_validation_check(workflow_json: &str, catalog_json: &str, values_json: &str) -> JsValue {
    to_js(&Response::from(quick_validation_check_inner(
        &ENGINE,
        workflow_json,
        catalog_json,
        values_json,
    )))
}

fn quick_validation_check_inner(
    engine: &ValidationEngine,
    workflow_json: &str,
    catalog_json: &str,
    values_json: &str,
) -> Result<QuickCheck, EngineError> {
    let (workflow, catalog, values) = parse_inputs(workflow_json, catalog_json, values_json)?;
    Ok(engine.quick_validation_check(&workflow, &catalog, &values))
}

/// Run one value through sanitize → convert → validate. `value_json` that is
/// not valid JSON is treated as a plain string, as is an unquoted number or
/// boolean entered for an `Address` or `String` parameter.
#[wasm_bindgen]
pub fn process_parameter(value_json: &str, param_type: &str, auto_correct: bool) -> JsValue {
    to_js(&process_parameter_inner(value_json, param_type, auto_correct))
}

fn process_parameter_inner(value_json: &str, param_type: &str, auto_correct: bool) -> ProcessResult {
    let param_type = ParamType::parse(param_type);
    let raw = match serde_json::from_str::<Value>(value_json) {
        Ok(Value::Number(_) | Value::Bool(_))
            if matches!(param_type, ParamType::Address | ParamType::String) =>
        {
            Value::String(value_json.trim().to_string())
        }
        Ok(value) => value,
        Err(_) => Value::String(value_json.to_string()),
    };
    process_value(&raw, &param_type, &ProcessOptions { auto_correct })
}

#[wasm_bindgen]
pub fn suggest_parameter_corrections(raw: &str, param_type: &str) -> JsValue {
    to_js(&suggest_parameter_corrections_inner(raw, param_type))
}

fn suggest_parameter_corrections_inner(raw: &str, param_type: &str) -> Vec<Suggestion> {
    suggest_corrections(raw, &ParamType::parse(param_type))
}

/// Drop every cached result. Returns the number of entries dropped.
#[wasm_bindgen]
pub fn clear_validation_cache() -> usize {
    ENGINE.clear_cache()
}

fn parse_inputs(
    workflow_json: &str,
    catalog_json: &str,
    values_json: &str,
) -> Result<(crate::order::ParsedWorkflow, MetadataCatalog, ParameterValues), EngineError> {
    let workflow = crate::load_workflow(workflow_json)?;
    let catalog = crate::parse::parse_catalog(catalog_json)?;
    let values = if values_json.trim().is_empty() {
        ParameterValues::new()
    } else {
        crate::parse::parse_parameter_values(values_json)?
    };
    Ok((workflow, catalog, values))
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum Response<T> {
    Ok { result: T },
    Error { message: String },
}

impl<T> From<Result<T, EngineError>> for Response<T> {
    fn from(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(result) => Response::Ok { result },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }
    }
}
