//! Workflow validation: every rule module, merged into one report.
//!
//! All checks run on every pass so the editor can show the whole picture at
//! once. The only early exit is an empty workflow.

pub mod connectivity;
pub mod dag;
pub mod edge_rules;
pub mod issue;
pub mod node_rules;
pub mod references;
pub mod structural;

pub use issue::{Issue, IssueCode, IssueCollector, IssueSummary, Severity, ValidationResult};

use serde::{Deserialize, Serialize};

use crate::algo::execution_order;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{Edge, Node, Workflow};
use crate::schema::SchemaCatalog;

/// Tunable parts of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorOptions {
    /// Check `{{ steps.* }}` placeholders against known nodes.
    pub check_expressions: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        ValidatorOptions {
            check_expressions: true,
        }
    }
}

/// Validates workflows against an injected schema catalog.
pub struct WorkflowValidator<'a, C: SchemaCatalog + ?Sized> {
    catalog: &'a C,
    options: ValidatorOptions,
}

impl<'a, C: SchemaCatalog + ?Sized> WorkflowValidator<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        WorkflowValidator {
            catalog,
            options: ValidatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn validate(&self, workflow: &Workflow) -> ValidationResult {
        self.validate_graph(&workflow.nodes, &workflow.edges)
    }

    pub fn validate_graph(&self, nodes: &[Node], edges: &[Edge]) -> ValidationResult {
        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "validating workflow"
        );
        let mut issues = IssueCollector::new();

        if !structural::validate_structure(nodes, &mut issues) {
            return ValidationResult::new(issues.into_issues(), None);
        }

        let graph = WorkflowGraph::build(nodes, edges);

        tracing::trace!("checking nodes and edges");
        node_rules::validate_nodes(nodes, self.catalog, &mut issues);
        edge_rules::validate_edges(nodes, edges, &mut issues);

        tracing::trace!("checking connectivity");
        connectivity::validate_connectivity(nodes, &graph, &mut issues);

        tracing::trace!("checking for cycles");
        let acyclic = dag::validate_dag(&graph, &mut issues);

        if self.options.check_expressions {
            tracing::trace!("checking expression references");
            references::validate_references(nodes, &mut issues);
        }

        let order = if acyclic {
            execution_order(&graph).ok()
        } else {
            None
        };
        let result = ValidationResult::new(issues.into_issues(), order);

        tracing::debug!(
            valid = result.valid,
            issues = result.issues.len(),
            acyclic = result.execution_order.is_some(),
            "workflow validated"
        );
        result
    }
}

/// Validate with default options.
pub fn validate_workflow<C>(nodes: &[Node], edges: &[Edge], catalog: &C) -> ValidationResult
where
    C: SchemaCatalog + ?Sized,
{
    WorkflowValidator::new(catalog).validate_graph(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::NodeCategory;
    use crate::schema::StaticCatalog;

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: ValidatorOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.check_expressions);
        let opts: ValidatorOptions =
            serde_json::from_str(r#"{"checkExpressions": false}"#).unwrap();
        assert!(!opts.check_expressions);
    }

    #[test]
    fn expression_checks_can_be_disabled() {
        let nodes = vec![
            Node::new("t", NodeCategory::Trigger).with_label("Start"),
            Node::new("a", NodeCategory::Action)
                .with_label("Send")
                .with_field("text", "{{ steps.nowhere.x }}"),
        ];
        let edges = vec![Edge::new("t", "a")];
        let catalog = StaticCatalog::new();

        let on = WorkflowValidator::new(&catalog).validate_graph(&nodes, &edges);
        assert_eq!(on.issues.len(), 1);
        assert_eq!(on.issues[0].code, IssueCode::UnresolvedReference);

        let off = WorkflowValidator::new(&catalog)
            .with_options(ValidatorOptions {
                check_expressions: false,
            })
            .validate_graph(&nodes, &edges);
        assert!(off.issues.is_empty());
        assert!(off.valid);
    }

    #[test]
    fn execution_order_present_despite_other_errors() {
        let nodes = vec![Node::new("a", NodeCategory::Action).with_label("A")];
        let result = validate_workflow(&nodes, &[], &StaticCatalog::new());
        assert!(!result.valid);
        assert_eq!(result.execution_order, Some(vec!["a".to_string()]));
    }
}
