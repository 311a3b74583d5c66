//! Composite readiness score.

use serde::{Deserialize, Serialize};

use crate::validate::WorkflowValidationResult;

pub const PARAMETERS_WEIGHT: u8 = 30;
pub const DATA_FLOW_WEIGHT: u8 = 25;
pub const CYCLES_WEIGHT: u8 = 25;
pub const ACTIONS_WEIGHT: u8 = 20;

pub const EMPTY_WORKFLOW_MESSAGE: &str = "Workflow has no actions to execute";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReadiness {
    pub parameters_configured: bool,
    pub data_flow_valid: bool,
    pub no_circular_dependencies: bool,
    pub all_actions_valid: bool,
    /// 0–100; 100 iff all four checks pass on a non-empty workflow.
    pub readiness_score: u8,
    pub readiness_message: String,
}

impl ExecutionReadiness {
    pub fn assess(validation: &WorkflowValidationResult, is_empty: bool) -> Self {
        let parameters_configured = validation.parameters_configured();
        let data_flow_valid = validation.data_flow.is_valid && validation.global_errors.is_empty();
        let no_circular_dependencies = !validation.data_flow.has_cycles();
        let all_actions_valid = validation.all_actions_valid();

        if is_empty {
            return ExecutionReadiness {
                parameters_configured,
                data_flow_valid,
                no_circular_dependencies,
                all_actions_valid,
                readiness_score: 0,
                readiness_message: EMPTY_WORKFLOW_MESSAGE.to_string(),
            };
        }

        let checks = [
            (parameters_configured, PARAMETERS_WEIGHT, "missing or invalid parameters"),
            (data_flow_valid, DATA_FLOW_WEIGHT, "broken data flow"),
            (no_circular_dependencies, CYCLES_WEIGHT, "circular dependencies"),
            (all_actions_valid, ACTIONS_WEIGHT, "invalid actions"),
        ];

        let mut score = 100u8;
        let mut problems = Vec::new();
        for (passed, weight, problem) in checks {
            if !passed {
                score = score.saturating_sub(weight);
                problems.push(problem);
            }
        }

        let readiness_message = if problems.is_empty() {
            "Ready to execute".to_string()
        } else {
            format!("Not ready: {}", problems.join(", "))
        };

        ExecutionReadiness {
            parameters_configured,
            data_flow_valid,
            no_circular_dependencies,
            all_actions_valid,
            readiness_score: score,
            readiness_message,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness_score == 100
    }
}
