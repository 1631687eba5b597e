//! petgraph-based directed graph wrapper for the editor workflow.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{Edge, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub id: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

/// Read-only graph view over one validation pass.
///
/// Node weights are node ids. Edges whose endpoints do not resolve are left
/// out; reporting them is the edge rules' job. A repeated node id keeps its
/// first occurrence.
#[derive(Debug)]
pub struct WorkflowGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl WorkflowGraph {
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_indices = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if node_indices.contains_key(&node.id) {
                continue;
            }
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        for edge in edges {
            let (Some(&s), Some(&t)) = (
                node_indices.get(&edge.source),
                node_indices.get(&edge.target),
            ) else {
                continue;
            };
            graph.add_edge(
                s,
                t,
                EdgeLabel {
                    id: edge.id.clone(),
                    source_handle: edge.source_handle.clone(),
                    target_handle: edge.target_handle.clone(),
                },
            );
        }

        WorkflowGraph {
            graph,
            node_indices,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn index_of(&self, node_id: &str) -> Option<NodeIndex> {
        self.node_indices.get(node_id).copied()
    }

    pub fn id_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Successor indices in edge insertion order (parallel edges repeat).
    pub fn successors_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_in_order(idx, Direction::Outgoing)
    }

    /// Predecessor indices in edge insertion order (parallel edges repeat).
    pub fn predecessors_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_in_order(idx, Direction::Incoming)
    }

    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        let Some(idx) = self.index_of(node_id) else {
            return vec![];
        };
        self.successors_of(idx)
            .into_iter()
            .map(|n| self.id_of(n))
            .collect()
    }

    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        let Some(idx) = self.index_of(node_id) else {
            return vec![];
        };
        self.predecessors_of(idx)
            .into_iter()
            .map(|n| self.id_of(n))
            .collect()
    }

    pub fn incoming_count(&self, node_id: &str) -> usize {
        self.index_of(node_id).map_or(0, |idx| {
            self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }

    pub fn outgoing_count(&self, node_id: &str) -> usize {
        self.index_of(node_id).map_or(0, |idx| {
            self.graph.edges_directed(idx, Direction::Outgoing).count()
        })
    }

    fn neighbors_in_order(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        // petgraph lists neighbors newest edge first
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.reverse();
        out
    }
}
