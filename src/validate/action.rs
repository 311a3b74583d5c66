//! Per-action checks: required parameters, literal type processing, network
//! compatibility. References are collected here and resolved workflow-wide.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, ValidationError, ValidationWarning};
use crate::params::{ParamIssue, ProcessOptions, process_value};
use crate::parse::reference::{ParameterValue, ValueReference, is_empty_value};
use crate::parse::types::{Action, ActionMetadata, ParamType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidParameter {
    pub name: String,
    pub param_type: ParamType,
    pub value: Value,
    pub errors: Vec<ParamIssue>,
}

/// A parameter whose value is `actionId.outputName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBinding {
    pub action_id: String,
    pub parameter: String,
    pub param_type: ParamType,
    pub reference: ValueReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionValidationResult {
    pub action_id: String,
    pub action_type: String,
    pub is_valid: bool,
    pub metadata_found: bool,
    pub missing_parameters: Vec<String>,
    pub invalid_parameters: Vec<InvalidParameter>,
    /// Sanitized, converted literal values by parameter name.
    pub processed_values: BTreeMap<String, Value>,
    pub references: Vec<ParameterBinding>,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ActionValidationResult {
    pub fn parameters_configured(&self) -> bool {
        self.missing_parameters.is_empty() && self.invalid_parameters.is_empty()
    }
}

/// A parameter as the validator sees it after merging the action's own
/// declarations with its metadata inputs.
#[derive(Debug, Clone)]
struct DeclaredParameter {
    name: String,
    param_type: ParamType,
    required: bool,
}

pub fn validate_action(
    action: &Action,
    metadata: Option<&ActionMetadata>,
    values: Option<&BTreeMap<String, Value>>,
    network: Option<&str>,
    opts: &ProcessOptions,
) -> ActionValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if metadata.is_none() {
        warnings.push(ValidationWarning::for_action(
            format!(
                "No metadata found for action '{}' (type '{}')",
                action.id, action.action_type
            ),
            &action.id,
        ));
    }

    let declared = declared_parameters(action, metadata, &mut warnings);

    let mut missing_parameters = Vec::new();
    let mut invalid_parameters = Vec::new();
    let mut processed_values = BTreeMap::new();
    let mut references = Vec::new();

    for param in &declared {
        let raw = values
            .and_then(|v| v.get(&param.name))
            .or_else(|| action.parameter(&param.name).map(|p| &p.value))
            .cloned()
            .unwrap_or(Value::Null);

        let parsed = ParameterValue::parse(&raw);
        if parsed.is_empty() {
            if param.required {
                missing_parameters.push(param.name.clone());
                errors.push(missing_parameter(
                    &action.id,
                    &param.name,
                    format!("Required parameter '{}' is not set", param.name),
                ));
            }
            continue;
        }

        match parsed {
            ParameterValue::Reference(reference) => references.push(ParameterBinding {
                action_id: action.id.clone(),
                parameter: param.name.clone(),
                param_type: param.param_type.clone(),
                reference,
            }),
            ParameterValue::Literal(value) => {
                let result = process_value(&value, &param.param_type, opts);
                for warning in &result.warnings {
                    warnings.push(ValidationWarning::for_action(
                        format!("{}: {}", param.name, warning),
                        &action.id,
                    ));
                }
                if result.is_valid && param.required && is_empty_value(&result.value) {
                    missing_parameters.push(param.name.clone());
                    errors.push(missing_parameter(
                        &action.id,
                        &param.name,
                        format!(
                            "Required parameter '{}' is empty after cleanup (entered {})",
                            param.name, value
                        ),
                    ));
                } else if result.is_valid {
                    processed_values.insert(param.name.clone(), result.value);
                } else {
                    for issue in &result.errors {
                        errors.push(ValidationError::for_parameter(
                            issue.kind,
                            format!("{}: {}", param.name, issue.message),
                            &action.id,
                            &param.name,
                        ));
                    }
                    invalid_parameters.push(InvalidParameter {
                        name: param.name.clone(),
                        param_type: param.param_type.clone(),
                        value,
                        errors: result.errors,
                    });
                }
            }
        }
    }

    if let Some(values) = values {
        for name in values.keys() {
            if !declared.iter().any(|p| &p.name == name) {
                warnings.push(ValidationWarning::for_action(
                    format!(
                        "Parameter '{}' is not declared for action type '{}' and will be ignored",
                        name, action.action_type
                    ),
                    &action.id,
                ));
            }
        }
    }

    if let (Some(metadata), Some(network)) = (metadata, network) {
        if !metadata.supports_network(network) {
            errors.push(ValidationError::for_action(
                ErrorKind::IncompatibleNetwork,
                format!(
                    "Action type '{}' is not available on network '{}' (supported: {})",
                    action.action_type,
                    network,
                    metadata.supported_networks.join(", ")
                ),
                &action.id,
            ));
        }
    }

    ActionValidationResult {
        action_id: action.id.clone(),
        action_type: action.action_type.clone(),
        is_valid: errors.is_empty(),
        metadata_found: metadata.is_some(),
        missing_parameters,
        invalid_parameters,
        processed_values,
        references,
        errors,
        warnings,
    }
}

fn missing_parameter(action_id: &str, name: &str, message: String) -> ValidationError {
    ValidationError::for_parameter(ErrorKind::MissingParameter, message, action_id, name)
}

/// Action parameters first, in declaration order, then metadata inputs the
/// action does not list. Metadata types win; required-ness is the union.
fn declared_parameters(
    action: &Action,
    metadata: Option<&ActionMetadata>,
    warnings: &mut Vec<ValidationWarning>,
) -> Vec<DeclaredParameter> {
    let mut declared: Vec<DeclaredParameter> = action
        .parameters
        .iter()
        .map(|p| {
            let input = metadata.and_then(|m| m.input(&p.name));
            let param_type = match input {
                Some(input) if input.param_type != p.param_type => {
                    warnings.push(ValidationWarning::for_action(
                        format!(
                            "Parameter '{}' declared as {} but metadata says {}; using {}",
                            p.name, p.param_type, input.param_type, input.param_type
                        ),
                        &action.id,
                    ));
                    input.param_type.clone()
                }
                Some(input) => input.param_type.clone(),
                None => p.param_type.clone(),
            };
            DeclaredParameter {
                name: p.name.clone(),
                param_type,
                required: p.required || input.is_some_and(|i| i.required),
            }
        })
        .collect();

    if let Some(metadata) = metadata {
        for input in &metadata.inputs {
            if action.parameter(&input.name).is_none() {
                declared.push(DeclaredParameter {
                    name: input.name.clone(),
                    param_type: input.param_type.clone(),
                    required: input.required,
                });
            }
        }
    }

    declared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{ActionParameter, FieldSpec};
    use serde_json::json;

    fn transfer_metadata() -> ActionMetadata {
        ActionMetadata {
            inputs: vec![
                FieldSpec { name: "recipient".into(), param_type: ParamType::Address, required: true },
                FieldSpec { name: "amount".into(), param_type: ParamType::UFix64, required: true },
                FieldSpec { name: "memo".into(), param_type: ParamType::String, required: false },
            ],
            outputs: vec![],
            gas_estimate: 50,
            supported_networks: vec!["testnet".into()],
            required_capabilities: vec![],
        }
    }

    fn transfer() -> Action {
        Action {
            id: "transfer-1".into(),
            action_type: "transfer".into(),
            parameters: vec![],
            next_actions: vec![],
        }
    }

    #[test]
    fn missing_required_parameters_are_listed() {
        let result = validate_action(&transfer(), Some(&transfer_metadata()), None, None, &ProcessOptions::default());
        assert!(!result.is_valid);
        assert_eq!(result.missing_parameters, vec!["recipient", "amount"]);
        assert!(result.errors.iter().all(|e| e.kind == ErrorKind::MissingParameter));
    }

    #[test]
    fn literal_values_are_processed() {
        let values = BTreeMap::from([
            ("recipient".to_string(), json!("1234567890abcdef")),
            ("amount".to_string(), json!("10.5")),
        ]);
        let result = validate_action(&transfer(), Some(&transfer_metadata()), Some(&values), None, &ProcessOptions::default());
        assert!(result.is_valid, "{:?}", result.errors);
        assert_eq!(result.processed_values["recipient"], json!("0x1234567890abcdef"));
        assert_eq!(result.processed_values["amount"], json!(10.5));
    }

    #[test]
    fn invalid_literal_is_reported_with_parameter() {
        let values = BTreeMap::from([
            ("recipient".to_string(), json!("0x1234567890abcdef")),
            ("amount".to_string(), json!("-4")),
        ]);
        let result = validate_action(&transfer(), Some(&transfer_metadata()), Some(&values), None, &ProcessOptions::default());
        assert_eq!(result.invalid_parameters.len(), 1);
        assert_eq!(result.invalid_parameters[0].name, "amount");
        assert_eq!(result.errors[0].kind, ErrorKind::OutOfRange);
        assert_eq!(result.errors[0].parameter.as_deref(), Some("amount"));
    }

    #[test]
    fn required_value_that_cleans_up_to_nothing_is_missing() {
        let values = BTreeMap::from([
            ("recipient".to_string(), json!("zzzz")),
            ("amount".to_string(), json!("1.0")),
            ("memo".to_string(), json!("\u{200B}\u{200B}")),
        ]);
        let result = validate_action(&transfer(), Some(&transfer_metadata()), Some(&values), None, &ProcessOptions::default());
        assert!(!result.is_valid);
        assert!(!result.parameters_configured());
        assert_eq!(result.missing_parameters, vec!["recipient"]);
        assert!(!result.processed_values.contains_key("recipient"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::MissingParameter);
        assert_eq!(result.errors[0].parameter.as_deref(), Some("recipient"));
    }

    #[test]
    fn references_are_collected_not_processed() {
        let values = BTreeMap::from([
            ("recipient".to_string(), json!("0x1234567890abcdef")),
            ("amount".to_string(), json!("swap-1.amountOut")),
        ]);
        let result = validate_action(&transfer(), Some(&transfer_metadata()), Some(&values), None, &ProcessOptions::default());
        assert!(result.is_valid);
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].reference.source_action_id, "swap-1");
        assert_eq!(result.references[0].param_type, ParamType::UFix64);
    }

    #[test]
    fn unknown_type_warns_and_checks_inline_parameters() {
        let mut action = transfer();
        action.parameters.push(ActionParameter {
            name: "flag".into(),
            param_type: ParamType::Bool,
            value: json!("maybe"),
            required: true,
        });
        let result = validate_action(&action, None, None, None, &ProcessOptions::default());
        assert!(!result.metadata_found);
        assert!(result.warnings[0].message.starts_with("No metadata found for action 'transfer-1'"));
        assert_eq!(result.errors[0].kind, ErrorKind::InvalidType);
    }

    #[test]
    fn unsupported_network_is_an_action_error() {
        let values = BTreeMap::from([
            ("recipient".to_string(), json!("0x1234567890abcdef")),
            ("amount".to_string(), json!("1.0")),
        ]);
        let result = validate_action(
            &transfer(),
            Some(&transfer_metadata()),
            Some(&values),
            Some("mainnet"),
            &ProcessOptions::default(),
        );
        assert!(!result.is_valid);
        assert!(result.parameters_configured());
        assert_eq!(result.errors[0].kind, ErrorKind::IncompatibleNetwork);
    }

    #[test]
    fn metadata_type_overrides_inline_declaration() {
        let mut action = transfer();
        action.parameters.push(ActionParameter {
            name: "amount".into(),
            param_type: ParamType::String,
            value: json!("abc"),
            required: false,
        });
        let result = validate_action(&action, Some(&transfer_metadata()), None, None, &ProcessOptions::default());
        assert!(result.warnings.iter().any(|w| w.message.contains("metadata says UFix64")));
        assert_eq!(result.invalid_parameters[0].param_type, ParamType::UFix64);
    }
}
