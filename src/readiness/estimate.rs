//! Static gas and execution-time estimates, plus the simulator seam.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::order::ParsedWorkflow;
use crate::parse::types::{MetadataCatalog, ParameterValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GasSource {
    Static,
    Simulated,
}

/// An external service that can price a workflow by running it against a
/// network or emulator.
pub trait GasSimulator: Send + Sync {
    fn simulate(
        &self,
        workflow: &ParsedWorkflow,
        catalog: &MetadataCatalog,
        values: &ParameterValues,
    ) -> Result<u64, EngineError>;
}

/// base + Σ gasEstimate + connections × surcharge. Actions without metadata
/// contribute nothing.
pub fn estimate_gas(workflow: &ParsedWorkflow, catalog: &MetadataCatalog, config: &EngineConfig) -> u64 {
    let actions: u64 = workflow
        .actions
        .iter()
        .filter_map(|a| catalog.get(&a.action_type))
        .map(|m| m.gas_estimate)
        .fold(0, u64::saturating_add);
    let connections = (workflow.summary.connection_count as u64).saturating_mul(config.gas_per_connection);

    config
        .base_gas_cost
        .saturating_add(actions)
        .saturating_add(connections)
}

pub fn estimate_execution_time_ms(workflow: &ParsedWorkflow, config: &EngineConfig) -> u64 {
    let actions = (workflow.summary.action_count as u64).saturating_mul(config.execution_time_per_action_ms);
    let connections =
        (workflow.summary.connection_count as u64).saturating_mul(config.execution_time_per_connection_ms);

    config
        .base_execution_time_ms
        .saturating_add(actions)
        .saturating_add(connections)
}
