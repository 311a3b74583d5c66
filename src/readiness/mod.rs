//! Execution-Readiness Aggregator.
//!
//! `ValidationEngine` runs the validator, scores the result, estimates cost,
//! and memoizes whole results by content hash. The cache never changes an
//! answer, only whether it is recomputed.

pub mod cache;
pub mod estimate;
pub mod score;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::EngineConfig;
use crate::error::{ValidationError, ValidationWarning};
use crate::order::ParsedWorkflow;
use crate::parse::types::{Action, MetadataCatalog, ParameterValues};
use crate::validate::{
    ActionValidationResult, WorkflowValidationResult, structural, validate_action, validate_workflow,
};

pub use cache::{CacheKey, ResultCache, compute_key};
pub use estimate::{GasSimulator, GasSource};
pub use score::ExecutionReadiness;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionValidation {
    pub can_execute: bool,
    pub execution_readiness: ExecutionReadiness,
    pub blocking_errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub estimated_gas_cost: u64,
    pub estimated_execution_time_ms: u64,
    pub gas_source: GasSource,
    pub validation: WorkflowValidationResult,
}

/// Per-keystroke check: parameters and structure only, no type resolution
/// across actions, no estimates, no cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickCheck {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warning_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub validations_computed: u64,
    pub cache_hits: u64,
    pub cached_entries: usize,
}

pub struct ValidationEngine {
    config: EngineConfig,
    cache: ResultCache<ExecutionValidation>,
    simulator: Option<Arc<dyn GasSimulator>>,
    validations_computed: AtomicU64,
    cache_hits: AtomicU64,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            cache: ResultCache::new(config.cache_ttl()),
            config,
            simulator: None,
            validations_computed: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
        }
    }

    pub fn with_simulator(mut self, simulator: Arc<dyn GasSimulator>) -> Self {
        self.simulator = Some(simulator);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[instrument(skip_all, fields(workflow = %workflow.id, actions = workflow.actions.len()))]
    pub fn validate_for_execution(
        &self,
        workflow: &ParsedWorkflow,
        catalog: &MetadataCatalog,
        values: &ParameterValues,
    ) -> Arc<ExecutionValidation> {
        if !self.config.cache_enabled {
            return Arc::new(self.compute(workflow, catalog, values));
        }

        let key = match compute_key(workflow, catalog, values) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "could not hash validation inputs, skipping cache");
                return Arc::new(self.compute(workflow, catalog, values));
            }
        };

        if let Some(hit) = self.cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "validation cache hit");
            return hit;
        }

        debug!(key = %key, "validation cache miss");
        let result = Arc::new(self.compute(workflow, catalog, values));
        self.cache.insert(key, Arc::clone(&result));
        result
    }

    fn compute(
        &self,
        workflow: &ParsedWorkflow,
        catalog: &MetadataCatalog,
        values: &ParameterValues,
    ) -> ExecutionValidation {
        self.validations_computed.fetch_add(1, Ordering::Relaxed);

        let validation = validate_workflow(workflow, catalog, values, &self.config.process_options());
        let execution_readiness = ExecutionReadiness::assess(&validation, workflow.is_empty());
        let can_execute = execution_readiness.is_ready() && !workflow.is_empty();

        let blocking_errors = validation.errors(workflow);
        let mut warnings = validation.all_warnings(workflow);

        for action in &workflow.actions {
            if !catalog.contains_key(&action.action_type) {
                warn!(action = %action.id, action_type = %action.action_type, "no metadata for action type");
            }
        }

        let mut estimated_gas_cost = estimate::estimate_gas(workflow, catalog, &self.config);
        let mut gas_source = GasSource::Static;
        if let (Some(simulator), true) = (&self.simulator, can_execute) {
            match simulator.simulate(workflow, catalog, values) {
                Ok(gas) => {
                    estimated_gas_cost = gas;
                    gas_source = GasSource::Simulated;
                }
                Err(e) => {
                    warn!(error = %e, "gas simulation failed, using static estimate");
                    warnings.push(ValidationWarning::new(format!(
                        "{}; using static gas estimate",
                        e
                    )));
                }
            }
        }

        ExecutionValidation {
            can_execute,
            execution_readiness,
            blocking_errors,
            warnings,
            estimated_gas_cost,
            estimated_execution_time_ms: estimate::estimate_execution_time_ms(workflow, &self.config),
            gas_source,
            validation,
        }
    }

    pub fn quick_validation_check(
        &self,
        workflow: &ParsedWorkflow,
        catalog: &MetadataCatalog,
        values: &ParameterValues,
    ) -> QuickCheck {
        let opts = self.config.process_options();
        let results: Vec<ActionValidationResult> = workflow
            .actions
            .iter()
            .map(|a| {
                validate_action(
                    a,
                    catalog.get(&a.action_type),
                    values.get(&a.id),
                    workflow.network.as_deref(),
                    &opts,
                )
            })
            .collect();

        let bindings: Vec<_> = results.iter().flat_map(|r| r.references.iter().cloned()).collect();
        let graph = structural::dependency_graph(workflow, &bindings);

        let mut errors: Vec<ValidationError> = results.iter().flat_map(|r| r.errors.iter().cloned()).collect();
        errors.extend(structural::dangling_edge_errors(workflow));
        errors.extend(structural::find_cycles(&graph).iter().map(ValidationError::from));

        QuickCheck {
            is_valid: errors.is_empty() && !workflow.is_empty(),
            warning_count: results.iter().map(|r| r.warnings.len()).sum(),
            errors,
        }
    }

    /// Check one action in isolation. References are collected but not
    /// resolved, since there is no workflow to resolve them against.
    pub fn validate_action_for_execution(
        &self,
        action: &Action,
        catalog: &MetadataCatalog,
        values: Option<&BTreeMap<String, Value>>,
        network: Option<&str>,
    ) -> ActionValidationResult {
        validate_action(
            action,
            catalog.get(&action.action_type),
            values,
            network,
            &self.config.process_options(),
        )
    }

    pub fn clear_cache(&self) -> usize {
        let dropped = self.cache.clear();
        debug!(dropped, "validation cache cleared");
        dropped
    }

    pub fn clear_expired_cache(&self) -> usize {
        let dropped = self.cache.clear_expired();
        debug!(dropped, "expired validation results evicted");
        dropped
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            validations_computed: self.validations_computed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cached_entries: self.cache.len(),
        }
    }
}
