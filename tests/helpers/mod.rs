use workflow_validator::parse::{self, Edge, Node, NodeCategory, Workflow};
use workflow_validator::schema::StaticCatalog;
use workflow_validator::validate::{Issue, IssueCode, ValidationResult};

// =============================================================================
// Fixtures
// =============================================================================

pub fn catalog() -> StaticCatalog {
    StaticCatalog::from_json(include_str!("../fixtures/catalog.json")).expect("catalog fixture parses")
}

pub fn example_workflow() -> Workflow {
    parse::parse(include_str!("../fixtures/example_workflow.json")).expect("example fixture parses")
}

pub fn broken_workflow() -> Workflow {
    parse::parse(include_str!("../fixtures/broken_workflow.json")).expect("broken fixture parses")
}

// =============================================================================
// Graph builders
// =============================================================================

pub fn trigger(id: &str) -> Node {
    Node::new(id, NodeCategory::Trigger).with_label(id)
}

pub fn action(id: &str) -> Node {
    Node::new(id, NodeCategory::Action).with_label(id)
}

pub fn actions(ids: &[&str]) -> Vec<Node> {
    ids.iter().map(|id| action(id)).collect()
}

pub fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
    pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect()
}

/// Deterministic pseudo-random graph: `n` nodes named `n0..`, `m` edges.
/// With `acyclic`, every edge points from a lower to a higher index.
pub fn random_graph(seed: u64, n: usize, m: usize, acyclic: bool) -> (Vec<Node>, Vec<Edge>) {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move |bound: usize| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as usize) % bound.max(1)
    };

    let nodes: Vec<Node> = (0..n).map(|i| action(&format!("n{i}"))).collect();
    let mut out = Vec::with_capacity(m);
    for _ in 0..m {
        let (mut s, mut t) = (next(n), next(n));
        if acyclic {
            if s == t {
                continue;
            }
            if s > t {
                std::mem::swap(&mut s, &mut t);
            }
        }
        out.push(Edge::new(format!("n{s}"), format!("n{t}")));
    }
    (nodes, out)
}

// =============================================================================
// Assertions
// =============================================================================

pub fn assert_has_issue(result: &ValidationResult, code: IssueCode) {
    assert!(
        result.issues.iter().any(|i| i.code == code),
        "Expected issue {}, got: {:?}",
        code,
        result.issues
    );
}

pub fn assert_no_issue(result: &ValidationResult, code: IssueCode) {
    assert!(
        !result.issues.iter().any(|i| i.code == code),
        "Did not expect issue {}, but got: {:?}",
        code,
        result.issues
    );
}

/// One line per issue, in report order.
pub fn render(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asserts `order` is a permutation of the node ids that respects every edge.
pub fn assert_respects_edges(order: &[String], nodes: &[Node], edges: &[Edge]) {
    assert_eq!(order.len(), nodes.len(), "order: {order:?}");
    let pos = |id: &str| {
        order
            .iter()
            .position(|o| o == id)
            .unwrap_or_else(|| panic!("'{id}' missing from order {order:?}"))
    };
    for edge in edges {
        assert!(
            pos(&edge.source) < pos(&edge.target),
            "{} must precede {} in {:?}",
            edge.source,
            edge.target,
            order
        );
    }
}
