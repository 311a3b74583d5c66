//! Resolves `actionId.outputName` references against the workflow and the
//! producers' declared outputs.

use serde::{Deserialize, Serialize};

use super::action::ParameterBinding;
use super::compat::{Compatibility, compatibility};
use crate::error::{ErrorDetail, ErrorKind, ValidationError};
use crate::order::ParsedWorkflow;
use crate::parse::types::{MetadataCatalog, ParamType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReference {
    pub source_action_id: String,
    pub source_output: String,
    pub source_type: ParamType,
    pub target_action_id: String,
    pub target_parameter: String,
    pub target_type: ParamType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReference {
    pub target_action_id: String,
    pub target_parameter: String,
    pub reference: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMismatch {
    pub source_action_id: String,
    pub source_output: String,
    pub source_type: ParamType,
    pub target_action_id: String,
    pub target_parameter: String,
    pub target_type: ParamType,
    /// An explicit conversion could bridge the two types.
    pub can_convert: bool,
}

impl From<&UnresolvedReference> for ValidationError {
    fn from(r: &UnresolvedReference) -> Self {
        ValidationError::for_parameter(
            ErrorKind::UnresolvedReference,
            format!("Reference '{}' cannot be resolved: {}", r.reference, r.reason),
            &r.target_action_id,
            &r.target_parameter,
        )
    }
}

impl From<&TypeMismatch> for ValidationError {
    fn from(m: &TypeMismatch) -> Self {
        let hint = if m.can_convert {
            " (an explicit conversion is required)"
        } else {
            ""
        };
        ValidationError::for_parameter(
            ErrorKind::TypeMismatch,
            format!(
                "Output '{}.{}' is {} but parameter '{}' expects {}{}",
                m.source_action_id,
                m.source_output,
                m.source_type,
                m.target_parameter,
                m.target_type,
                hint
            ),
            &m.target_action_id,
            &m.target_parameter,
        )
        .with_detail(ErrorDetail::TypeMismatch {
            source_action_id: m.source_action_id.clone(),
            source_output: m.source_output.clone(),
            source_type: m.source_type.to_string(),
            target_action_id: m.target_action_id.clone(),
            target_parameter: m.target_parameter.clone(),
            target_type: m.target_type.to_string(),
            can_convert: m.can_convert,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub resolved: Vec<ResolvedReference>,
    pub unresolved: Vec<UnresolvedReference>,
    pub mismatches: Vec<TypeMismatch>,
}

pub fn resolve_references(
    workflow: &ParsedWorkflow,
    catalog: &MetadataCatalog,
    bindings: &[ParameterBinding],
) -> Resolution {
    let mut resolution = Resolution::default();

    for binding in bindings {
        let reference = &binding.reference;
        let unresolved = |reason: String| UnresolvedReference {
            target_action_id: binding.action_id.clone(),
            target_parameter: binding.parameter.clone(),
            reference: reference.to_string(),
            reason,
        };

        let Some(source) = workflow.action(&reference.source_action_id) else {
            resolution.unresolved.push(unresolved(format!(
                "action '{}' does not exist in this workflow",
                reference.source_action_id
            )));
            continue;
        };

        let Some(metadata) = catalog.get(&source.action_type) else {
            resolution.unresolved.push(unresolved(format!(
                "no metadata for action type '{}', outputs are unknown",
                source.action_type
            )));
            continue;
        };

        let Some(output) = metadata.output(&reference.output_name) else {
            resolution.unresolved.push(unresolved(format!(
                "action '{}' has no output named '{}'",
                reference.source_action_id, reference.output_name
            )));
            continue;
        };

        match compatibility(&output.param_type, &binding.param_type) {
            Compatibility::Compatible => resolution.resolved.push(ResolvedReference {
                source_action_id: reference.source_action_id.clone(),
                source_output: reference.output_name.clone(),
                source_type: output.param_type.clone(),
                target_action_id: binding.action_id.clone(),
                target_parameter: binding.parameter.clone(),
                target_type: binding.param_type.clone(),
            }),
            found => resolution.mismatches.push(TypeMismatch {
                source_action_id: reference.source_action_id.clone(),
                source_output: reference.output_name.clone(),
                source_type: output.param_type.clone(),
                target_action_id: binding.action_id.clone(),
                target_parameter: binding.parameter.clone(),
                target_type: binding.param_type.clone(),
                can_convert: found == Compatibility::Convertible,
            }),
        }
    }

    resolution
}
