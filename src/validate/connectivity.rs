//! Connectivity rules: trigger placement, orphaned and unreachable nodes.

use std::collections::HashSet;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;

use super::issue::{IssueCode, IssueCollector};
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::Node;

pub fn validate_connectivity(nodes: &[Node], graph: &WorkflowGraph, issues: &mut IssueCollector) {
    let triggers: Vec<NodeIndex> = nodes
        .iter()
        .filter(|n| n.is_trigger())
        .filter_map(|n| graph.index_of(&n.id))
        .collect();

    // Without a trigger the reachable set is empty.
    let reachable = reachable_from(graph, &triggers);

    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            continue;
        }
        let Some(idx) = graph.index_of(&node.id) else {
            continue;
        };
        let incoming = graph.graph.edges_directed(idx, Direction::Incoming).count();
        let outgoing = graph.graph.edges_directed(idx, Direction::Outgoing).count();

        if node.is_trigger() {
            if incoming > 0 {
                issues
                    .warning(
                        IssueCode::TriggerHasIncoming,
                        format!(
                            "Trigger '{}' has incoming connections; triggers must not be targets",
                            node.display_name()
                        ),
                    )
                    .on_node(&node.id)
                    .suggest("Remove the connections leading into the trigger");
            }
            if outgoing == 0 {
                issues
                    .warning(
                        IssueCode::TriggerNotConnected,
                        format!("Trigger '{}' is connected to nothing", node.display_name()),
                    )
                    .on_node(&node.id)
                    .suggest("Connect the trigger to the first step of the workflow");
            }
            continue;
        }

        if incoming == 0 {
            issues
                .warning(
                    IssueCode::OrphanedNode,
                    format!(
                        "Node '{}' is not connected to the workflow",
                        node.display_name()
                    ),
                )
                .on_node(&node.id)
                .suggest("Connect it to a previous step or delete it");
            continue;
        }

        if !reachable.contains(&idx) {
            issues
                .warning(
                    IssueCode::UnreachableNode,
                    format!(
                        "Node '{}' is not reachable from any trigger",
                        node.display_name()
                    ),
                )
                .on_node(&node.id)
                .suggest("Connect it to a path that starts at a trigger");
        }
    }
}

/// Forward reachability from all triggers at once; each node and edge is
/// visited at most once.
fn reachable_from(graph: &WorkflowGraph, starts: &[NodeIndex]) -> HashSet<NodeIndex> {
    let mut reachable = HashSet::with_capacity(graph.node_count());
    let mut dfs = Dfs::empty(&graph.graph);
    for &start in starts {
        dfs.move_to(start);
        while let Some(nx) = dfs.next(&graph.graph) {
            reachable.insert(nx);
        }
    }
    reachable
}
