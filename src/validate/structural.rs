//! Workflow-shape checks over the union of graph edges and reference edges:
//! cycles, orphans, dangling links, producers scheduled after consumers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::action::ParameterBinding;
use crate::error::{ErrorDetail, ErrorKind, ValidationError, ValidationWarning};
use crate::order::ParsedWorkflow;
use crate::parse::graph::DependencyGraph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularDependency {
    pub cycle: Vec<String>,
    /// `a → b → a`
    pub description: String,
}

impl CircularDependency {
    pub fn new(cycle: Vec<String>) -> Self {
        let mut path = cycle.clone();
        if let Some(first) = cycle.first() {
            path.push(first.clone());
        }
        CircularDependency {
            description: path.join(" → "),
            cycle,
        }
    }
}

impl From<&CircularDependency> for ValidationError {
    fn from(c: &CircularDependency) -> Self {
        let error = ValidationError::new(
            ErrorKind::CircularDependency,
            format!("Circular dependency: {}", c.description),
        );
        let error = match c.cycle.first() {
            Some(first) => ValidationError {
                action_id: Some(first.clone()),
                ..error
            },
            None => error,
        };
        error.with_detail(ErrorDetail::Cycle {
            cycle: c.cycle.clone(),
        })
    }
}

/// Graph edges plus one producer → consumer edge per reference whose
/// producer exists. A self-reference becomes a self-loop.
pub fn dependency_graph(workflow: &ParsedWorkflow, bindings: &[ParameterBinding]) -> DependencyGraph {
    let mut edges: HashMap<&str, Vec<String>> = HashMap::new();
    for action in &workflow.actions {
        edges
            .entry(action.id.as_str())
            .or_default()
            .extend(action.next_actions.iter().cloned());
    }
    for binding in bindings {
        edges
            .entry(binding.reference.source_action_id.as_str())
            .or_default()
            .push(binding.action_id.clone());
    }

    DependencyGraph::build(workflow.actions.iter().map(|a| a.id.as_str()), |id| {
        edges.get(id).cloned().unwrap_or_default()
    })
}

pub fn find_cycles(graph: &DependencyGraph) -> Vec<CircularDependency> {
    graph.cycles().into_iter().map(CircularDependency::new).collect()
}

/// Actions with no edge of either kind, in declaration order. A single
/// action is never an orphan.
pub fn find_orphans(workflow: &ParsedWorkflow, graph: &DependencyGraph) -> Vec<String> {
    if workflow.actions.len() < 2 {
        return vec![];
    }
    workflow
        .actions
        .iter()
        .map(|a| a.id.as_str())
        .filter(|id| graph.successors(id).is_empty() && graph.predecessors(id).is_empty())
        .map(str::to_string)
        .collect()
}

pub fn dangling_edge_errors(workflow: &ParsedWorkflow) -> Vec<ValidationError> {
    workflow
        .dangling_edges()
        .into_iter()
        .map(|(source, target)| {
            ValidationError::for_action(
                ErrorKind::UnresolvedReference,
                format!("Action '{}' links to unknown action '{}'", source, target),
                source,
            )
        })
        .collect()
}

/// A reference is only satisfiable if its producer runs first.
pub fn reference_order_warnings(
    workflow: &ParsedWorkflow,
    bindings: &[ParameterBinding],
) -> Vec<ValidationWarning> {
    let positions = workflow.positions();
    bindings
        .iter()
        .filter(|b| b.reference.source_action_id != b.action_id)
        .filter_map(|b| {
            let source = positions.get(b.reference.source_action_id.as_str())?;
            let target = positions.get(b.action_id.as_str())?;
            (source > target).then(|| {
                ValidationWarning::for_action(
                    format!(
                        "Parameter '{}' uses '{}' but action '{}' is scheduled after '{}'",
                        b.parameter, b.reference, b.reference.source_action_id, b.action_id
                    ),
                    &b.action_id,
                )
            })
        })
        .collect()
}
