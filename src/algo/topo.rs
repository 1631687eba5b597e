//! Topological sort of the workflow graph.

use petgraph::algo::toposort;
use serde::{Deserialize, Serialize};

use super::cycles::first_cycle;
use crate::error::{Error, Result};
use crate::parse::graph::WorkflowGraph;

/// Returns node ids so that every edge's source precedes its target.
///
/// On a cyclic graph the error carries the first witness cycle.
pub fn execution_order(graph: &WorkflowGraph) -> Result<Vec<String>> {
    match toposort(&graph.graph, None) {
        Ok(indices) => Ok(indices
            .into_iter()
            .map(|idx| graph.id_of(idx).to_string())
            .collect()),
        Err(cycle) => {
            let path = first_cycle(graph)
                .unwrap_or_else(|| vec![graph.id_of(cycle.node_id()).to_string()]);
            Err(Error::Cycle { path })
        }
    }
}

/// Serializable outcome of a topological sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologicalOrder {
    pub success: bool,
    pub order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<Vec<String>>> for TopologicalOrder {
    fn from(result: Result<Vec<String>>) -> Self {
        match result {
            Ok(order) => TopologicalOrder {
                success: true,
                order,
                error: None,
            },
            Err(e) => TopologicalOrder {
                success: false,
                order: vec![],
                error: Some(e.to_string()),
            },
        }
    }
}
