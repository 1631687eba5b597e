//! Parse phase: JSON → Rust types + graph construction.

pub mod graph;
pub mod types;

pub use graph::WorkflowGraph;
pub use types::*;

use crate::error::Result;

/// Deserialize a workflow JSON string into a `Workflow` struct.
pub fn parse(json: &str) -> Result<Workflow> {
    Ok(serde_json::from_str::<Workflow>(json)?)
}

/// Parse JSON and build the graph in one step.
pub fn parse_and_build(json: &str) -> Result<(Workflow, WorkflowGraph)> {
    let workflow = parse(json)?;
    let graph = WorkflowGraph::build(&workflow.nodes, &workflow.edges);
    Ok((workflow, graph))
}
