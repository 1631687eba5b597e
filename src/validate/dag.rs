//! DAG rule: one error per cycle witness.

use super::issue::{IssueCode, IssueCollector};
use crate::algo::find_cycles;
use crate::parse::graph::WorkflowGraph;

/// Returns `true` when the graph is acyclic.
pub fn validate_dag(graph: &WorkflowGraph, issues: &mut IssueCollector) -> bool {
    let cycles = find_cycles(graph);
    let acyclic = cycles.is_empty();
    for cycle in cycles {
        let Some(first) = cycle.first() else {
            continue;
        };
        let message = if cycle.len() == 2 {
            format!("Node '{}' loops back to itself", first)
        } else {
            format!("Cycle detected: {}", cycle.join(" → "))
        };
        issues
            .error(IssueCode::Cycle, message)
            .on_node(first)
            .suggest("Remove one of the connections in the loop");
    }
    acyclic
}
