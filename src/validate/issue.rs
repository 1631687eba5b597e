//! Issue model and the consolidated validation report.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Stable machine code for each kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // Structure
    EmptyWorkflow,
    MissingTrigger,
    MultipleTriggers,
    DuplicateNodeId,
    // Nodes
    MissingLabel,
    RequiredField,
    TypeMismatch,
    PatternMismatch,
    InvalidSchemaPattern,
    OutOfRange,
    InvalidLength,
    InvalidOption,
    InvalidJson,
    // Edges
    DanglingEdge,
    SelfLoop,
    DuplicateEdge,
    // Connectivity
    TriggerHasIncoming,
    TriggerNotConnected,
    OrphanedNode,
    UnreachableNode,
    // DAG
    Cycle,
    // Expressions
    UnresolvedReference,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::EmptyWorkflow => "EMPTY_WORKFLOW",
            IssueCode::MissingTrigger => "MISSING_TRIGGER",
            IssueCode::MultipleTriggers => "MULTIPLE_TRIGGERS",
            IssueCode::DuplicateNodeId => "DUPLICATE_NODE_ID",
            IssueCode::MissingLabel => "MISSING_LABEL",
            IssueCode::RequiredField => "REQUIRED_FIELD",
            IssueCode::TypeMismatch => "TYPE_MISMATCH",
            IssueCode::PatternMismatch => "PATTERN_MISMATCH",
            IssueCode::InvalidSchemaPattern => "INVALID_SCHEMA_PATTERN",
            IssueCode::OutOfRange => "OUT_OF_RANGE",
            IssueCode::InvalidLength => "INVALID_LENGTH",
            IssueCode::InvalidOption => "INVALID_OPTION",
            IssueCode::InvalidJson => "INVALID_JSON",
            IssueCode::DanglingEdge => "DANGLING_EDGE",
            IssueCode::SelfLoop => "SELF_LOOP",
            IssueCode::DuplicateEdge => "DUPLICATE_EDGE",
            IssueCode::TriggerHasIncoming => "TRIGGER_HAS_INCOMING",
            IssueCode::TriggerNotConnected => "TRIGGER_NOT_CONNECTED",
            IssueCode::OrphanedNode => "ORPHANED_NODE",
            IssueCode::UnreachableNode => "UNREACHABLE_NODE",
            IssueCode::Cycle => "CYCLE",
            IssueCode::UnresolvedReference => "UNRESOLVED_REFERENCE",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique within one [`ValidationResult`].
    pub id: String,
    pub severity: Severity,
    pub code: IssueCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub auto_fixable: bool,
}

impl Issue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn on_node(&mut self, node_id: impl Into<String>) -> &mut Self {
        self.node_id = Some(node_id.into());
        self
    }

    /// Edges saved without an id deserialize with `""`; that is not recorded.
    pub fn on_edge(&mut self, edge_id: impl Into<String>) -> &mut Self {
        let edge_id = edge_id.into();
        self.edge_id = (!edge_id.is_empty()).then_some(edge_id);
        self
    }

    pub fn on_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.field = Some(field.into());
        self
    }

    pub fn suggest(&mut self, suggestion: impl Into<String>) -> &mut Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn fixable(&mut self, auto_fixable: bool) -> &mut Self {
        self.auto_fixable = auto_fixable;
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.severity, self.code, self.message)?;
        match (&self.node_id, &self.field) {
            (Some(node), Some(field)) => write!(f, " (node '{}', field '{}')", node, field),
            (Some(node), None) => write!(f, " (node '{}')", node),
            _ => Ok(()),
        }
    }
}

/// Collects issues for one validation pass and hands out their ids.
///
/// The counter lives in the collector, so ids restart at `issue-1` for every
/// pass and concurrent passes share nothing.
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Vec<Issue>,
    next_id: usize,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
    ) -> &mut Issue {
        self.next_id += 1;
        self.issues.push(Issue {
            id: format!("issue-{}", self.next_id),
            severity,
            code,
            node_id: None,
            edge_id: None,
            field: None,
            message: message.into(),
            suggestion: None,
            auto_fixable: false,
        });
        let last = self.issues.len() - 1;
        &mut self.issues[last]
    }

    pub fn error(&mut self, code: IssueCode, message: impl Into<String>) -> &mut Issue {
        self.push(Severity::Error, code, message)
    }

    pub fn warning(&mut self, code: IssueCode, message: impl Into<String>) -> &mut Issue {
        self.push(Severity::Warning, code, message)
    }

    pub fn info(&mut self, code: IssueCode, message: impl Into<String>) -> &mut Issue {
        self.push(Severity::Info, code, message)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

/// The consolidated report of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff no issue has error severity.
    pub valid: bool,
    pub issues: Vec<Issue>,
    /// Present iff the graph is acyclic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_order: Option<Vec<String>>,
}

impl ValidationResult {
    pub fn new(issues: Vec<Issue>, execution_order: Option<Vec<String>>) -> Self {
        ValidationResult {
            valid: !issues.iter().any(Issue::is_error),
            issues,
            execution_order,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn issues_with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Issues scoped to one node, for per-node badges.
    pub fn issues_for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |i| i.node_id.as_deref() == Some(node_id))
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues_with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues_with_severity(Severity::Warning)
    }

    pub fn summary(&self) -> IssueSummary {
        IssueSummary::from_issues(&self.issues)
    }
}

/// Issue counts per severity; displays as e.g. `2 errors, 1 warning`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl IssueSummary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |mut acc, issue| {
            match issue.severity {
                Severity::Error => acc.errors += 1,
                Severity::Warning => acc.warnings += 1,
                Severity::Info => acc.infos += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

impl fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "No issues");
        }
        let parts: Vec<String> = [
            (self.errors, "error"),
            (self.warnings, "warning"),
            (self.infos, "info"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, word)| {
            if n == 1 {
                format!("{} {}", n, word)
            } else {
                format!("{} {}s", n, word)
            }
        })
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}
