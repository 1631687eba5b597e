//! Structural validation for editor workflow graphs.
//!
//! Given the nodes and edges drawn on the canvas plus a node-type schema
//! catalog, [`validate::WorkflowValidator`] produces every structural and
//! configuration problem in one severity-ranked report, together with an
//! execution order whenever the graph is acyclic.

pub mod algo;
pub mod error;
pub mod parse;
pub mod schema;
pub mod validate;
pub mod wasm;

pub use algo::{TopologicalOrder, detect_cycles, is_valid_dag, topological_order};
pub use error::{Error, Result};
pub use parse::{Edge, FieldValue, Node, NodeCategory, Workflow};
pub use schema::{FieldDescriptor, FieldType, FieldValidation, NodeTypeSchema, SchemaCatalog, StaticCatalog};
pub use validate::{
    Issue, IssueCode, IssueSummary, Severity, ValidationResult, ValidatorOptions,
    WorkflowValidator, validate_workflow,
};
