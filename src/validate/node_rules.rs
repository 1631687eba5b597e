//! Per-node configuration validation against the node-type schema catalog.

use std::collections::HashMap;

use regex::Regex;

use super::issue::{IssueCode, IssueCollector};
use crate::parse::types::{FieldValue, Node};
use crate::schema::{FieldDescriptor, FieldType, SchemaCatalog};

/// Validate every node's label and schema-declared fields.
pub fn validate_nodes<C>(nodes: &[Node], catalog: &C, issues: &mut IssueCollector)
where
    C: SchemaCatalog + ?Sized,
{
    let mut patterns = PatternCache::default();
    for node in nodes {
        validate_node(node, catalog, &mut patterns, issues);
    }
}

fn validate_node<C>(
    node: &Node,
    catalog: &C,
    patterns: &mut PatternCache,
    issues: &mut IssueCollector,
) where
    C: SchemaCatalog + ?Sized,
{
    if node.label().is_none() {
        issues
            .warning(
                IssueCode::MissingLabel,
                format!("Node '{}' has no name", node.id),
            )
            .on_node(&node.id)
            .on_field("label")
            .suggest(format!("Name it '{}'", synthetic_label(node)))
            .fixable(true);
    }

    // Unknown node types have no field constraints.
    let Some(schema) = node.node_type().and_then(|t| catalog.schema(t)) else {
        return;
    };

    for descriptor in &schema.fields {
        validate_field(node, descriptor, node.field(&descriptor.name), patterns, issues);
    }
}

/// A value narrowed to what the descriptor's declared type allows.
#[derive(Clone, Copy)]
enum Typed<'a> {
    Text(&'a str),
    Number(f64),
    Opaque,
}

fn validate_field(
    node: &Node,
    descriptor: &FieldDescriptor,
    value: Option<&FieldValue>,
    patterns: &mut PatternCache,
    issues: &mut IssueCollector,
) {
    let label = descriptor.display_label();

    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            if descriptor.required {
                let issue = issues
                    .error(IssueCode::RequiredField, format!("{} is required", label))
                    .on_node(&node.id)
                    .on_field(&descriptor.name)
                    .fixable(descriptor.default_value.is_some());
                if let Some(default) = &descriptor.default_value {
                    issue.suggest(format!("Use the default value {}", default));
                }
            }
            return;
        }
    };

    let Some(typed) = narrow(&descriptor.field_type, value) else {
        issues
            .error(
                IssueCode::TypeMismatch,
                format!(
                    "{} must be {}, got {}",
                    label,
                    expected_kind(&descriptor.field_type),
                    value.kind()
                ),
            )
            .on_node(&node.id)
            .on_field(&descriptor.name);
        return;
    };

    if let Some(rules) = &descriptor.validation {
        match typed {
            Typed::Text(s) => {
                if let Some(pattern) = &rules.pattern {
                    match patterns.get(pattern) {
                        Some(re) => {
                            if !re.is_match(s) {
                                issues
                                    .error(
                                        IssueCode::PatternMismatch,
                                        format!("{} has an invalid format", label),
                                    )
                                    .on_node(&node.id)
                                    .on_field(&descriptor.name)
                                    .suggest(format!("Expected a value matching {}", pattern));
                            }
                        }
                        None => {
                            issues
                                .warning(
                                    IssueCode::InvalidSchemaPattern,
                                    format!(
                                        "{} declares an invalid pattern and was not checked",
                                        label
                                    ),
                                )
                                .on_node(&node.id)
                                .on_field(&descriptor.name);
                        }
                    }
                }

                let len = s.chars().count();
                if let Some(min) = rules.min_length.filter(|&min| len < min) {
                    issues
                        .error(
                            IssueCode::InvalidLength,
                            format!("{} must be at least {} characters", label, min),
                        )
                        .on_node(&node.id)
                        .on_field(&descriptor.name);
                }
                if let Some(max) = rules.max_length.filter(|&max| len > max) {
                    issues
                        .error(
                            IssueCode::InvalidLength,
                            format!("{} must be at most {} characters", label, max),
                        )
                        .on_node(&node.id)
                        .on_field(&descriptor.name);
                }
            }
            Typed::Number(n) => {
                if let Some(min) = rules.min.filter(|&min| n < min) {
                    issues
                        .error(
                            IssueCode::OutOfRange,
                            format!("{} must be at least {}", label, min),
                        )
                        .on_node(&node.id)
                        .on_field(&descriptor.name)
                        .suggest(format!("Set it to {}", min))
                        .fixable(true);
                }
                if let Some(max) = rules.max.filter(|&max| n > max) {
                    issues
                        .error(
                            IssueCode::OutOfRange,
                            format!("{} must be at most {}", label, max),
                        )
                        .on_node(&node.id)
                        .on_field(&descriptor.name)
                        .suggest(format!("Set it to {}", max))
                        .fixable(true);
                }
            }
            Typed::Opaque => {}
        }
    }

    if let (Typed::Text(s), Some(options)) = (&typed, &descriptor.options) {
        if descriptor.field_type == FieldType::Select
            && !options.is_empty()
            && !options.iter().any(|o| o.value == *s)
        {
            let allowed: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
            issues
                .error(
                    IssueCode::InvalidOption,
                    format!("{} must be one of: {}", label, allowed.join(", ")),
                )
                .on_node(&node.id)
                .on_field(&descriptor.name);
        }
    }

    if let (FieldType::Json, Typed::Text(s)) = (&descriptor.field_type, &typed) {
        if let Err(e) = serde_json::from_str::<serde_json::Value>(s) {
            issues
                .error(
                    IssueCode::InvalidJson,
                    format!("{} contains invalid JSON", label),
                )
                .on_node(&node.id)
                .on_field(&descriptor.name)
                .suggest(format!("Fix the JSON syntax: {}", e));
        }
    }
}

/// `None` when the value cannot be read as the declared type.
fn narrow<'a>(field_type: &FieldType, value: &'a FieldValue) -> Option<Typed<'a>> {
    match (field_type, value) {
        // `"NaN"` and `"inf"` parse but cannot be range checked.
        (FieldType::Number, FieldValue::Number(n)) => {
            Some(*n).filter(|n| n.is_finite()).map(Typed::Number)
        }
        (FieldType::Number, FieldValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Typed::Number),
        (FieldType::Number, _) => None,

        (FieldType::Boolean, FieldValue::Bool(_)) => Some(Typed::Opaque),
        (FieldType::Boolean, _) => None,

        (FieldType::Json, FieldValue::Text(s)) => Some(Typed::Text(s)),
        (FieldType::Json, _) => Some(Typed::Opaque),

        (FieldType::Other, FieldValue::Text(s)) => Some(Typed::Text(s)),
        (FieldType::Other, FieldValue::Number(n)) => Some(Typed::Number(*n)),
        (FieldType::Other, _) => Some(Typed::Opaque),

        // Text-like fields.
        (_, FieldValue::Text(s)) => Some(Typed::Text(s)),
        (_, FieldValue::Number(_) | FieldValue::Bool(_)) => Some(Typed::Opaque),
        (_, FieldValue::Json(_) | FieldValue::Null) => None,
    }
}

fn expected_kind(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Number => "a number",
        FieldType::Boolean => "true or false",
        FieldType::Json => "JSON",
        _ => "text",
    }
}

/// A readable default name: `httpRequest` → `Http Request`.
fn synthetic_label(node: &Node) -> String {
    let raw = node.node_type().unwrap_or(node.category.as_str());
    let mut out = String::with_capacity(raw.len() + 4);
    let mut new_word = true;
    for c in raw.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            new_word = true;
            continue;
        }
        if c.is_uppercase() && !out.is_empty() {
            new_word = true;
        }
        if new_word {
            if !out.is_empty() {
                out.push(' ');
            }
            out.extend(c.to_uppercase());
            new_word = false;
        } else {
            out.push(c);
        }
    }
    if out.is_empty() {
        "Untitled".to_string()
    } else {
        out
    }
}

/// Compiled schema patterns for one pass; a pattern that fails to compile is
/// remembered as `None`.
#[derive(Default)]
struct PatternCache {
    compiled: HashMap<String, Option<Regex>>,
}

impl PatternCache {
    fn get(&mut self, pattern: &str) -> Option<&Regex> {
        self.compiled
            .entry(pattern.to_string())
            .or_insert_with(|| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "schema pattern does not compile");
                    None
                }
            })
            .as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parse::types::NodeCategory;
    use crate::schema::{FieldValidation, NodeTypeSchema, StaticCatalog};
    use crate::validate::issue::{Issue, Severity};

    fn catalog() -> StaticCatalog {
        StaticCatalog::new().with(
            "http",
            NodeTypeSchema::new(vec![
                FieldDescriptor::new("url", "URL", FieldType::Url)
                    .required()
                    .with_validation(FieldValidation {
                        pattern: Some("^https?://".into()),
                        max_length: Some(40),
                        ..Default::default()
                    }),
                FieldDescriptor::new("method", "Method", FieldType::Select)
                    .required()
                    .with_default(json!("GET"))
                    .with_options(["GET", "POST"]),
                FieldDescriptor::new("timeout", "Timeout", FieldType::Number).with_validation(
                    FieldValidation {
                        min: Some(1.0),
                        max: Some(300.0),
                        ..Default::default()
                    },
                ),
                FieldDescriptor::new("body", "Body", FieldType::Json),
                FieldDescriptor::new("name", "Name", FieldType::Text).with_validation(
                    FieldValidation {
                        min_length: Some(3),
                        ..Default::default()
                    },
                ),
                FieldDescriptor::new("follow", "Follow redirects", FieldType::Boolean),
            ]),
        )
    }

    fn http(fields: &[(&str, FieldValue)]) -> Node {
        let mut node = Node::new("n1", NodeCategory::Action)
            .with_label("Fetch")
            .with_node_type("http");
        for (k, v) in fields {
            node = node.with_field(*k, v.clone());
        }
        node
    }

    fn run(node: Node) -> Vec<Issue> {
        let mut issues = IssueCollector::new();
        validate_nodes(&[node], &catalog(), &mut issues);
        issues.into_issues()
    }

    fn find(issues: &[Issue], code: IssueCode) -> &Issue {
        issues
            .iter()
            .find(|i| i.code == code)
            .unwrap_or_else(|| panic!("expected {code}, got {issues:?}"))
    }

    #[test]
    fn valid_node_has_no_issues() {
        let issues = run(http(&[
            ("url", "https://api.example.com".into()),
            ("method", "POST".into()),
            ("timeout", 30i64.into()),
            ("body", r#"{"a": 1}"#.into()),
            ("name", "fetch".into()),
            ("follow", true.into()),
        ]));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn required_fields() {
        let issues = run(http(&[("url", "  ".into())]));
        let url = issues
            .iter()
            .find(|i| i.field.as_deref() == Some("url"))
            .unwrap();
        assert_eq!(url.code, IssueCode::RequiredField);
        assert_eq!(url.message, "URL is required");
        assert!(!url.auto_fixable);

        let method = issues
            .iter()
            .find(|i| i.field.as_deref() == Some("method"))
            .unwrap();
        assert!(method.auto_fixable);
        assert_eq!(method.suggestion.as_deref(), Some("Use the default value \"GET\""));
    }

    #[test]
    fn empty_optional_fields_skip_checks() {
        let issues = run(http(&[
            ("url", "https://x.io".into()),
            ("method", "GET".into()),
            ("timeout", FieldValue::Null),
            ("body", "".into()),
            ("name", "".into()),
        ]));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn pattern_and_length() {
        let issues = run(http(&[
            ("url", "ftp://a-very-long-host-name.example.com/path".into()),
            ("method", "GET".into()),
            ("name", "ab".into()),
        ]));
        assert_eq!(find(&issues, IssueCode::PatternMismatch).message, "URL has an invalid format");
        let lengths: Vec<&str> = issues
            .iter()
            .filter(|i| i.code == IssueCode::InvalidLength)
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            lengths,
            vec!["URL must be at most 40 characters", "Name must be at least 3 characters"]
        );
    }

    #[test]
    fn numeric_range_is_fixable() {
        let issues = run(http(&[
            ("url", "https://x.io".into()),
            ("method", "GET".into()),
            ("timeout", 500i64.into()),
        ]));
        let issue = find(&issues, IssueCode::OutOfRange);
        assert_eq!(issue.message, "Timeout must be at most 300");
        assert!(issue.auto_fixable);
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn numeric_strings_are_range_checked() {
        let issues = run(http(&[
            ("url", "https://x.io".into()),
            ("method", "GET".into()),
            ("timeout", "0".into()),
        ]));
        assert_eq!(find(&issues, IssueCode::OutOfRange).message, "Timeout must be at least 1");
    }

    #[test]
    fn non_finite_numeric_strings_are_mismatches() {
        for raw in ["NaN", "inf", "-Infinity"] {
            let issues = run(http(&[
                ("url", "https://x.io".into()),
                ("method", "GET".into()),
                ("timeout", raw.into()),
            ]));
            assert_eq!(issues.len(), 1, "{raw}: {issues:?}");
            let issue = find(&issues, IssueCode::TypeMismatch);
            assert_eq!(issue.message, "Timeout must be a number, got string");
            assert_eq!(issue.field.as_deref(), Some("timeout"));
        }
    }

    #[test]
    fn type_mismatch_gates_other_checks() {
        let issues = run(http(&[
            ("url", "https://x.io".into()),
            ("method", "GET".into()),
            ("timeout", "soon".into()),
            ("follow", "yes".into()),
        ]));
        let mismatches: Vec<&str> = issues
            .iter()
            .filter(|i| i.code == IssueCode::TypeMismatch)
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            mismatches,
            vec![
                "Timeout must be a number, got string",
                "Follow redirects must be true or false, got string"
            ]
        );
        assert!(!issues.iter().any(|i| i.code == IssueCode::OutOfRange));
    }

    #[test]
    fn select_option_and_invalid_json() {
        let issues = run(http(&[
            ("url", "https://x.io".into()),
            ("method", "FETCH".into()),
            ("body", "{not json".into()),
        ]));
        assert_eq!(find(&issues, IssueCode::InvalidOption).message, "Method must be one of: GET, POST");
        assert_eq!(find(&issues, IssueCode::InvalidJson).message, "Body contains invalid JSON");
    }

    #[test]
    fn structured_json_value_is_accepted() {
        let issues = run(http(&[
            ("url", "https://x.io".into()),
            ("method", "GET".into()),
            ("body", json!({"k": [1, 2]}).into()),
        ]));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn missing_label_is_fixable_warning() {
        let node = Node::new("n9", NodeCategory::Action).with_node_type("httpRequest");
        let issues = run(node);
        let issue = find(&issues, IssueCode::MissingLabel);
        assert_eq!(issue.severity, Severity::Warning);
        assert!(issue.auto_fixable);
        assert_eq!(issue.suggestion.as_deref(), Some("Name it 'Http Request'"));
    }

    #[test]
    fn unknown_node_type_is_tolerated() {
        let node = Node::new("n1", NodeCategory::Action)
            .with_label("Custom")
            .with_node_type("brandNew");
        assert!(run(node).is_empty());
    }

    #[test]
    fn invalid_schema_pattern_degrades_to_warning() {
        let catalog = StaticCatalog::new().with(
            "x",
            NodeTypeSchema::new(vec![FieldDescriptor::new("f", "F", FieldType::Text)
                .with_validation(FieldValidation {
                    pattern: Some("([unclosed".into()),
                    ..Default::default()
                })]),
        );
        let node = Node::new("n1", NodeCategory::Action)
            .with_label("X")
            .with_node_type("x")
            .with_field("f", "value");
        let mut issues = IssueCollector::new();
        validate_nodes(&[node.clone(), node], &catalog, &mut issues);
        let issues = issues.into_issues();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == IssueCode::InvalidSchemaPattern));
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }
}
