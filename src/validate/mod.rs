//! Data-Flow Validator.
//!
//! Per-action parameter checks, then reference resolution and workflow
//! structure. Every finding is collected; nothing short-circuits.

pub mod action;
pub mod compat;
pub mod references;
pub mod structural;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationWarning};
use crate::order::ParsedWorkflow;
use crate::params::ProcessOptions;
use crate::parse::types::{MetadataCatalog, ParameterValues};

pub use action::{ActionValidationResult, InvalidParameter, ParameterBinding, validate_action};
pub use references::{ResolvedReference, TypeMismatch, UnresolvedReference};
pub use structural::CircularDependency;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlowResult {
    pub is_valid: bool,
    pub resolved_references: Vec<ResolvedReference>,
    pub unresolved_references: Vec<UnresolvedReference>,
    pub type_mismatches: Vec<TypeMismatch>,
    pub circular_dependencies: Vec<CircularDependency>,
    pub orphaned_actions: Vec<String>,
}

impl DataFlowResult {
    pub fn has_cycles(&self) -> bool {
        !self.circular_dependencies.is_empty()
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.unresolved_references
            .iter()
            .map(ValidationError::from)
            .chain(self.type_mismatches.iter().map(ValidationError::from))
            .chain(self.circular_dependencies.iter().map(ValidationError::from))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowValidationResult {
    pub is_valid: bool,
    pub action_results: BTreeMap<String, ActionValidationResult>,
    pub data_flow: DataFlowResult,
    /// Errors not tied to a single parameter, such as links to unknown actions.
    pub global_errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl WorkflowValidationResult {
    /// Every blocking error: per-action (declaration order), global, then
    /// data-flow.
    pub fn errors(&self, workflow: &ParsedWorkflow) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = workflow
            .actions
            .iter()
            .filter_map(|a| self.action_results.get(&a.id))
            .flat_map(|r| r.errors.iter().cloned())
            .collect();
        errors.extend(self.global_errors.iter().cloned());
        errors.extend(self.data_flow.errors());
        errors
    }

    pub fn all_warnings(&self, workflow: &ParsedWorkflow) -> Vec<ValidationWarning> {
        let mut warnings: Vec<ValidationWarning> = workflow
            .actions
            .iter()
            .filter_map(|a| self.action_results.get(&a.id))
            .flat_map(|r| r.warnings.iter().cloned())
            .collect();
        warnings.extend(self.warnings.iter().cloned());
        warnings
    }

    pub fn parameters_configured(&self) -> bool {
        self.action_results.values().all(|r| r.parameters_configured())
    }

    pub fn all_actions_valid(&self) -> bool {
        self.action_results.values().all(|r| r.is_valid)
    }
}

pub fn validate_workflow(
    workflow: &ParsedWorkflow,
    catalog: &MetadataCatalog,
    values: &ParameterValues,
    opts: &ProcessOptions,
) -> WorkflowValidationResult {
    let action_results: BTreeMap<String, ActionValidationResult> = workflow
        .actions
        .iter()
        .map(|a| {
            let result = validate_action(
                a,
                catalog.get(&a.action_type),
                values.get(&a.id),
                workflow.network.as_deref(),
                opts,
            );
            (a.id.clone(), result)
        })
        .collect();

    let bindings: Vec<ParameterBinding> = workflow
        .actions
        .iter()
        .filter_map(|a| action_results.get(&a.id))
        .flat_map(|r| r.references.iter().cloned())
        .collect();

    let resolution = references::resolve_references(workflow, catalog, &bindings);
    let graph = structural::dependency_graph(workflow, &bindings);
    let circular_dependencies = structural::find_cycles(&graph);
    let orphaned_actions = structural::find_orphans(workflow, &graph);

    let mut warnings: Vec<ValidationWarning> = orphaned_actions
        .iter()
        .map(|id| {
            ValidationWarning::for_action(
                format!("Action '{}' is not connected to any other action", id),
                id,
            )
        })
        .collect();
    warnings.extend(structural::reference_order_warnings(workflow, &bindings));
    for id in values.keys() {
        if workflow.action(id).is_none() {
            warnings.push(ValidationWarning::new(format!(
                "Parameter values supplied for unknown action '{}'",
                id
            )));
        }
    }

    let global_errors = structural::dangling_edge_errors(workflow);

    let data_flow = DataFlowResult {
        is_valid: resolution.unresolved.is_empty()
            && resolution.mismatches.is_empty()
            && circular_dependencies.is_empty(),
        resolved_references: resolution.resolved,
        unresolved_references: resolution.unresolved,
        type_mismatches: resolution.mismatches,
        circular_dependencies,
        orphaned_actions,
    };

    WorkflowValidationResult {
        is_valid: data_flow.is_valid
            && global_errors.is_empty()
            && action_results.values().all(|r| r.is_valid),
        action_results,
        data_flow,
        global_errors,
        warnings,
    }
}
