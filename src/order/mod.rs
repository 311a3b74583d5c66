//! Graph Orderer: raw action graph → `ParsedWorkflow`.
//!
//! Ordering never fails. A cyclic graph yields an execution order shorter
//! than the action list; naming the cycle is left to the data-flow validator.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::parse::graph::DependencyGraph;
use crate::parse::types::{Action, WorkflowDefinition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub action_count: usize,
    /// Graph edges between known actions, duplicates collapsed.
    pub connection_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedWorkflow {
    pub id: String,
    pub network: Option<String>,
    /// Declaration order; ids are unique.
    pub actions: Vec<Action>,
    pub execution_order: Vec<String>,
    pub root_actions: Vec<String>,
    pub summary: WorkflowSummary,
}

impl ParsedWorkflow {
    pub fn from_definition(definition: WorkflowDefinition) -> Result<Self, EngineError> {
        let mut parsed = ParsedWorkflow::from_actions(definition.actions)?;
        parsed.id = definition.id;
        parsed.network = definition.network;
        Ok(parsed)
    }

    pub fn from_actions(actions: Vec<Action>) -> Result<Self, EngineError> {
        let mut seen = BTreeSet::new();
        for action in &actions {
            if action.id.is_empty() {
                return Err(EngineError::EmptyActionId);
            }
            if !seen.insert(action.id.as_str()) {
                return Err(EngineError::DuplicateActionId(action.id.clone()));
            }
        }

        let ordering = order(&actions);
        Ok(ParsedWorkflow {
            id: String::new(),
            network: None,
            summary: WorkflowSummary {
                action_count: actions.len(),
                connection_count: ordering.connection_count,
            },
            execution_order: ordering.execution_order,
            root_actions: ordering.root_actions,
            actions,
        })
    }

    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// True iff the graph edges contain no cycle.
    pub fn is_fully_ordered(&self) -> bool {
        self.execution_order.len() == self.actions.len()
    }

    /// Actions left out of the execution order (on or behind a graph cycle).
    pub fn unordered_actions(&self) -> Vec<&str> {
        let ordered: BTreeSet<&str> = self.execution_order.iter().map(String::as_str).collect();
        self.actions
            .iter()
            .map(|a| a.id.as_str())
            .filter(|id| !ordered.contains(id))
            .collect()
    }

    /// Position of each action in the execution order.
    pub fn positions(&self) -> HashMap<&str, usize> {
        self.execution_order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect()
    }

    /// `(source, target)` graph edges whose target is not a known action.
    pub fn dangling_edges(&self) -> Vec<(&str, &str)> {
        let known: BTreeSet<&str> = self.actions.iter().map(|a| a.id.as_str()).collect();
        self.actions
            .iter()
            .flat_map(|a| {
                a.next_actions
                    .iter()
                    .filter(|next| !known.contains(next.as_str()))
                    .map(move |next| (a.id.as_str(), next.as_str()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub execution_order: Vec<String>,
    pub root_actions: Vec<String>,
    pub connection_count: usize,
}

/// Kahn ordering over `nextActions` edges.
pub fn order(actions: &[Action]) -> Ordering {
    let graph = flow_graph(actions);
    Ordering {
        execution_order: graph.topological_order(),
        root_actions: graph.roots(),
        connection_count: graph.edge_count(),
    }
}

/// Dependency graph over `nextActions` edges only.
pub fn flow_graph(actions: &[Action]) -> DependencyGraph {
    let edges: HashMap<&str, &[String]> = actions
        .iter()
        .map(|a| (a.id.as_str(), a.next_actions.as_slice()))
        .collect();
    DependencyGraph::build(actions.iter().map(|a| a.id.as_str()), |id| {
        edges.get(id).map(|next| next.to_vec()).unwrap_or_default()
    })
}
