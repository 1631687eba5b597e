//! Edge rules: dangling endpoints, self loops, duplicate connections.

use std::collections::HashSet;

use super::issue::{IssueCode, IssueCollector};
use crate::parse::types::{Edge, Node};

pub fn validate_edges(nodes: &[Node], edges: &[Edge], issues: &mut IssueCollector) {
    let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(edges.len());

    for edge in edges {
        dangling_endpoints(edge, &node_ids, issues);

        if edge.source == edge.target {
            issues
                .error(
                    IssueCode::SelfLoop,
                    format!("Node '{}' is connected to itself", edge.source),
                )
                .on_node(&edge.source)
                .on_edge(&edge.id)
                .suggest("Remove the connection");
        }

        if !seen.insert((edge.source.as_str(), edge.target.as_str())) {
            issues
                .warning(
                    IssueCode::DuplicateEdge,
                    format!(
                        "Duplicate connection from '{}' to '{}'",
                        edge.source, edge.target
                    ),
                )
                .on_node(&edge.source)
                .on_edge(&edge.id)
                .suggest("Remove the duplicate connection")
                .fixable(true);
        }
    }
}

fn dangling_endpoints(edge: &Edge, node_ids: &HashSet<&str>, issues: &mut IssueCollector) {
    for (end, id) in [("source", &edge.source), ("target", &edge.target)] {
        if !node_ids.contains(id.as_str()) {
            issues
                .error(
                    IssueCode::DanglingEdge,
                    format!("Connection references missing {} node '{}'", end, id),
                )
                .on_edge(&edge.id)
                .suggest("Remove the connection or restore the node")
                .fixable(true);
        }
    }
}
