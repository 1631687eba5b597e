//! Workflow-level structure rules: emptiness, trigger count, node id uniqueness.

use std::collections::HashSet;

use super::issue::{IssueCode, IssueCollector};
use crate::parse::types::Node;

/// Returns `false` when the workflow is empty and no further checks apply.
pub fn validate_structure(nodes: &[Node], issues: &mut IssueCollector) -> bool {
    if nodes.is_empty() {
        issues
            .error(IssueCode::EmptyWorkflow, "Workflow is empty")
            .suggest("Add a trigger node to start building the workflow");
        return false;
    }

    trigger_count(nodes, issues);
    unique_node_ids(nodes, issues);
    true
}

fn trigger_count(nodes: &[Node], issues: &mut IssueCollector) {
    let count = nodes.iter().filter(|n| n.is_trigger()).count();
    if count == 0 {
        issues
            .error(IssueCode::MissingTrigger, "Workflow must have a trigger node")
            .suggest("Add a trigger such as a webhook or schedule to start the workflow");
    } else if count > 1 {
        issues
            .warning(
                IssueCode::MultipleTriggers,
                format!(
                    "Workflow has {} trigger nodes; each one starts an independent run",
                    count
                ),
            )
            .suggest("Keep a single trigger unless multiple entry points are intended");
    }
}

fn unique_node_ids(nodes: &[Node], issues: &mut IssueCollector) {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            issues
                .error(
                    IssueCode::DuplicateNodeId,
                    format!("Node id '{}' is used more than once", node.id),
                )
                .on_node(&node.id);
        }
    }
}
