//! Expression reference rule: `{{ steps.<name>.path }}` must name a known node.
//!
//! Names resolve against node ids and labels after normalization, so
//! `{{steps.fetch_user.body}}` finds a node labelled "Fetch User". Bracket
//! form `{{ steps["Fetch User"].body }}` is accepted too. Placeholders that do
//! not start with `steps` are someone else's concern.

use std::collections::{BTreeSet, HashSet};

use super::issue::{IssueCode, IssueCollector};
use crate::parse::types::{FieldValue, Node};

pub fn validate_references(nodes: &[Node], issues: &mut IssueCollector) {
    let known: HashSet<String> = nodes
        .iter()
        .flat_map(|n| [Some(n.id.as_str()), n.label()])
        .flatten()
        .map(normalize)
        .collect();

    for node in nodes {
        for (field, value) in &node.data.fields {
            let mut texts = Vec::new();
            collect_strings(value, &mut texts);

            let unresolved: BTreeSet<&str> = texts
                .iter()
                .flat_map(|s| step_references(s))
                .filter(|name| !known.contains(&normalize(name)))
                .collect();

            for name in unresolved {
                issues
                    .warning(
                        IssueCode::UnresolvedReference,
                        format!("Reference to unknown step '{}'", name),
                    )
                    .on_node(&node.id)
                    .on_field(field)
                    .suggest("Use the id or name of an existing step");
            }
        }
    }
}

/// Step names referenced by `{{ steps.<name>... }}` placeholders in `input`.
pub fn step_references(input: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut remaining = input;

    while let Some(start) = remaining.find("{{") {
        let after_open = &remaining[start + 2..];
        let Some(end) = after_open.find("}}") else {
            // Unterminated placeholder: nothing more to read.
            break;
        };
        if let Some(name) = parse_step_name(after_open[..end].trim()) {
            names.push(name);
        }
        remaining = &after_open[end + 2..];
    }

    names
}

fn parse_step_name(inner: &str) -> Option<&str> {
    let rest = inner.strip_prefix("steps")?;

    let name = if let Some(dotted) = rest.strip_prefix('.') {
        let stop = dotted.find(['.', '[', ' ']).unwrap_or(dotted.len());
        &dotted[..stop]
    } else if let Some(bracketed) = rest.strip_prefix('[') {
        let quote = bracketed.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let body = &bracketed[1..];
        &body[..body.find(quote)?]
    } else {
        return None;
    };

    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Lower-case; whitespace, `-` and `_` runs collapse to a single `_`.
fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        out.extend(c.to_lowercase());
    }
    out
}

fn collect_strings<'a>(value: &'a FieldValue, out: &mut Vec<&'a str>) {
    match value {
        FieldValue::Text(s) => out.push(s),
        FieldValue::Json(v) => collect_json_strings(v, out),
        FieldValue::Null | FieldValue::Bool(_) | FieldValue::Number(_) => {}
    }
}

fn collect_json_strings<'a>(value: &'a serde_json::Value, out: &mut Vec<&'a str>) {
    match value {
        serde_json::Value::String(s) => out.push(s),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_json_strings(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for v in map.values() {
                collect_json_strings(v, out);
            }
        }
        _ => {}
    }
}
