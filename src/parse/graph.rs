//! petgraph-backed directed graph over action ids.
//!
//! Used for both graph edges (`nextActions`) and reference edges, so ordering
//! and cycle detection live in one place.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

pub struct DependencyGraph {
    pub graph: DiGraph<String, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build from a list of ids and an edge-extraction function.
    ///
    /// Edges to ids outside `ids` are dropped and duplicate edges collapse.
    pub fn build<'a, F, I>(ids: impl IntoIterator<Item = &'a str>, mut edges_of: F) -> Self
    where
        F: FnMut(&str) -> I,
        I: IntoIterator<Item = String>,
    {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for id in ids {
            if !node_indices.contains_key(id) {
                let idx = graph.add_node(id.to_string());
                node_indices.insert(id.to_string(), idx);
            }
        }

        let sources: Vec<(String, NodeIndex)> = graph
            .node_indices()
            .map(|idx| (graph[idx].clone(), idx))
            .collect();

        for (id, source) in sources {
            for target in edges_of(id.as_str()) {
                if let Some(&t) = node_indices.get(&target) {
                    graph.update_edge(source, t, ());
                }
            }
        }

        DependencyGraph {
            graph,
            node_indices,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(id) else {
            return vec![];
        };
        self.sorted_neighbors(idx, direction)
            .into_iter()
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// petgraph yields neighbors newest-edge-first; sort by insertion order
    /// so results are stable.
    fn sorted_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(idx, direction).collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }

    /// Ids with no incoming edge, in insertion order.
    pub fn roots(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Kahn's algorithm. Nodes on or behind a cycle never reach in-degree
    /// zero and are left out, so a short result is the cycle signal.
    pub fn topological_order(&self) -> Vec<String> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| (idx, self.sorted_neighbors(idx, Direction::Incoming).len()))
            .collect();

        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(idx) = queue.pop_front() {
            order.push(self.graph[idx].clone());
            for next in self.sorted_neighbors(idx, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(next);
                    }
                }
            }
        }

        order
    }

    pub fn has_cycle(&self) -> bool {
        self.topological_order().len() < self.graph.node_count()
    }

    /// One concrete cycle per strongly connected component, each as an
    /// ordered list of ids starting from the earliest-inserted member.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = Vec::new();

        for mut component in tarjan_scc(&self.graph) {
            let is_cycle = component.len() > 1
                || self.graph.contains_edge(component[0], component[0]);
            if !is_cycle {
                continue;
            }
            component.sort();
            let members: HashSet<NodeIndex> = component.iter().copied().collect();
            if let Some(path) = self.cycle_through(component[0], &members) {
                cycles.push(path.into_iter().map(|n| self.graph[n].clone()).collect());
            }
        }

        cycles.sort_by_key(|cycle| self.node_indices.get(&cycle[0]).copied());
        cycles
    }

    /// Shortest path from `start` back to itself inside one component.
    fn cycle_through(&self, start: NodeIndex, members: &HashSet<NodeIndex>) -> Option<Vec<NodeIndex>> {
        if self.graph.contains_edge(start, start) {
            return Some(vec![start]);
        }

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(idx) = queue.pop_front() {
            for next in self.sorted_neighbors(idx, Direction::Outgoing) {
                if !members.contains(&next) {
                    continue;
                }
                if next == start {
                    let mut path = vec![idx];
                    let mut cursor = idx;
                    while let Some(&p) = parent.get(&cursor) {
                        path.push(p);
                        cursor = p;
                    }
                    path.reverse();
                    return Some(path);
                }
                if !parent.contains_key(&next) {
                    parent.insert(next, idx);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}
