//! Graph algorithms: cycle detection, DAG check, topological ordering.
//!
//! The slice-based functions build a throwaway [`WorkflowGraph`]; callers that
//! already hold one use [`find_cycles`] and [`execution_order`] directly.

pub mod cycles;
pub mod topo;

pub use cycles::{find_cycles, first_cycle};
pub use topo::{TopologicalOrder, execution_order};

use crate::error::Result;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{Edge, Node};

/// Every cycle witness in the graph; empty when acyclic.
pub fn detect_cycles(nodes: &[Node], edges: &[Edge]) -> Vec<Vec<String>> {
    find_cycles(&WorkflowGraph::build(nodes, edges))
}

/// True iff the graph has no cycle (self loops included).
pub fn is_valid_dag(nodes: &[Node], edges: &[Edge]) -> bool {
    detect_cycles(nodes, edges).is_empty()
}

/// A total order consistent with every edge, or the cycle preventing one.
pub fn topological_order(nodes: &[Node], edges: &[Edge]) -> Result<Vec<String>> {
    execution_order(&WorkflowGraph::build(nodes, edges))
}
