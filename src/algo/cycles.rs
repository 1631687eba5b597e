//! Cycle detection with cycle-path reconstruction.
//!
//! Three-colour depth-first search driven by an explicit stack, so very deep
//! graphs cannot exhaust the call stack. Every edge into a node that is still
//! on the stack closes a cycle; the witness path is read back off the stack.
//! One witness per back edge is reported, not every simple cycle.

use std::collections::HashSet;
use std::ops::ControlFlow;

use petgraph::graph::NodeIndex;

use crate::parse::graph::WorkflowGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet.
    White,
    /// On the current DFS stack.
    Gray,
    /// Fully explored.
    Black,
}

struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    cursor: usize,
}

impl Frame {
    fn new(graph: &WorkflowGraph, node: NodeIndex) -> Self {
        Frame {
            node,
            successors: graph.successors_of(node),
            cursor: 0,
        }
    }
}

/// Returns one id sequence per cycle, each closing on its first id
/// (`[a, b, a]`; a self loop is `[a, a]`). Cycles are listed in the order
/// their closing edge was discovered.
pub fn find_cycles(graph: &WorkflowGraph) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    walk(graph, |cycle| {
        cycles.push(cycle);
        ControlFlow::Continue(())
    });
    cycles
}

/// The first cycle [`find_cycles`] would report, without exploring the rest
/// of the graph.
pub fn first_cycle(graph: &WorkflowGraph) -> Option<Vec<String>> {
    let mut found = None;
    walk(graph, |cycle| {
        found = Some(cycle);
        ControlFlow::Break(())
    });
    found
}

fn walk<F>(graph: &WorkflowGraph, mut on_cycle: F)
where
    F: FnMut(Vec<String>) -> ControlFlow<()>,
{
    let mut color = vec![Color::White; graph.node_count()];
    let mut frames: Vec<Frame> = Vec::new();
    let mut seen: HashSet<Vec<NodeIndex>> = HashSet::new();

    for start in graph.graph.node_indices() {
        if color[start.index()] != Color::White {
            continue;
        }
        color[start.index()] = Color::Gray;
        frames.push(Frame::new(graph, start));

        while let Some(frame) = frames.last_mut() {
            let Some(&next) = frame.successors.get(frame.cursor) else {
                color[frame.node.index()] = Color::Black;
                frames.pop();
                continue;
            };
            frame.cursor += 1;

            match color[next.index()] {
                Color::White => {
                    color[next.index()] = Color::Gray;
                    frames.push(Frame::new(graph, next));
                }
                Color::Gray => {
                    let Some(pos) = frames.iter().rposition(|f| f.node == next) else {
                        continue;
                    };
                    let mut path: Vec<NodeIndex> = frames[pos..].iter().map(|f| f.node).collect();
                    path.push(next);
                    if !seen.insert(path.clone()) {
                        continue;
                    }
                    let ids = path
                        .into_iter()
                        .map(|idx| graph.id_of(idx).to_string())
                        .collect();
                    if on_cycle(ids).is_break() {
                        return;
                    }
                }
                Color::Black => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{Edge, Node, NodeCategory};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> WorkflowGraph {
        let nodes: Vec<Node> = ids
            .iter()
            .map(|id| Node::new(*id, NodeCategory::Action))
            .collect();
        let edges: Vec<Edge> = edges.iter().map(|(s, t)| Edge::new(*s, *t)).collect();
        WorkflowGraph::build(&nodes, &edges)
    }

    #[test]
    fn no_edges_no_cycles() {
        assert!(find_cycles(&graph(&["a", "b", "c"], &[])).is_empty());
        assert!(find_cycles(&graph(&[], &[])).is_empty());
    }

    #[test]
    fn self_loop() {
        assert_eq!(find_cycles(&graph(&["a"], &[("a", "a")])), vec![vec!["a", "a"]]);
    }

    #[test]
    fn three_cycle_reconstructed_from_stack() {
        let cycles = find_cycles(&graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")],
        ));
        assert_eq!(cycles, vec![vec!["b", "c", "d", "b"]]);
    }

    #[test]
    fn independent_cycles_each_reported() {
        let cycles = find_cycles(&graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
        ));
        assert_eq!(cycles, vec![vec!["a", "b", "a"], vec!["c", "d", "c"]]);
    }

    #[test]
    fn parallel_back_edges_reported_once() {
        let cycles = find_cycles(&graph(&["a", "b"], &[("a", "b"), ("b", "a"), ("b", "a")]));
        assert_eq!(cycles.len(), 1);
    }

    #[test]
    fn cleared_subgraph_not_rewalked() {
        // c is reached from both a and b; it is explored once and never
        // mistaken for a cycle.
        let cycles = find_cycles(&graph(
            &["a", "b", "c"],
            &[("a", "c"), ("b", "c")],
        ));
        assert!(cycles.is_empty());
    }

    #[test]
    fn first_cycle_matches_full_search() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
        );
        assert_eq!(first_cycle(&g), find_cycles(&g).into_iter().next());
        assert_eq!(first_cycle(&g), Some(vec!["a".to_string(), "b".into(), "a".into()]));
        assert_eq!(first_cycle(&graph(&["a", "b"], &[("a", "b")])), None);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let nodes: Vec<Node> = ids
            .iter()
            .map(|id| Node::new(id.as_str(), NodeCategory::Action))
            .collect();
        let mut edges: Vec<Edge> = ids.windows(2).map(|w| Edge::new(&w[0], &w[1])).collect();
        edges.push(Edge::new("n49999", "n0"));
        let cycles = find_cycles(&WorkflowGraph::build(&nodes, &edges));
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 50_001);
    }
}
