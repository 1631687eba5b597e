//! Serde types for the editor's workflow JSON.
//!
//! Nodes carry an open `data` mapping: `label` and `nodeType` are lifted into
//! named fields, every other key lands in [`NodeData::fields`] as a
//! dynamically-typed [`FieldValue`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL WORKFLOW
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Workflow {
            id: None,
            name: None,
            nodes,
            edges,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Edge {
            id: format!("{}->{}", source, target),
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default)]
    pub category: NodeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, category: NodeCategory) -> Self {
        Node {
            id: id.into(),
            category,
            position: None,
            data: NodeData::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = Some(label.into());
        self
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.data.node_type = Some(node_type.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.fields.insert(name.into(), value.into());
        self
    }

    pub fn is_trigger(&self) -> bool {
        self.category == NodeCategory::Trigger
    }

    /// The `nodeType` discriminator used for schema lookup.
    pub fn node_type(&self) -> Option<&str> {
        self.data.node_type.as_deref()
    }

    /// Trimmed label, `None` when missing or blank.
    pub fn label(&self) -> Option<&str> {
        self.data
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Label for messages: the node's label, or its id when unnamed.
    pub fn display_name(&self) -> &str {
        self.label().unwrap_or(&self.id)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.data.fields.get(name)
    }
}

/// Node category, serialized as the node's `type`.
///
/// Categories the engine does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeCategory {
    Trigger,
    Action,
    Control,
    Ai,
    Other(String),
}

impl Default for NodeCategory {
    fn default() -> Self {
        NodeCategory::Other(String::new())
    }
}

impl NodeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            NodeCategory::Trigger => "trigger",
            NodeCategory::Action => "action",
            NodeCategory::Control => "control",
            NodeCategory::Ai => "ai",
            NodeCategory::Other(s) => s,
        }
    }
}

impl From<String> for NodeCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "trigger" => NodeCategory::Trigger,
            "action" => NodeCategory::Action,
            "control" => NodeCategory::Control,
            "ai" => NodeCategory::Ai,
            _ => NodeCategory::Other(s),
        }
    }
}

impl From<NodeCategory> for String {
    fn from(c: NodeCategory) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

// =============================================================================
// FIELD VALUES
// =============================================================================

/// A dynamically-typed configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays and objects.
    Json(serde_json::Value),
}

impl FieldValue {
    /// Null, blank strings and empty arrays/objects count as "not filled in".
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Json(serde_json::Value::Array(a)) => a.is_empty(),
            FieldValue::Json(serde_json::Value::Object(o)) => o.is_empty(),
            FieldValue::Json(serde_json::Value::Null) => true,
            FieldValue::Bool(_) | FieldValue::Number(_) | FieldValue::Json(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
            FieldValue::Json(serde_json::Value::Array(_)) => "array",
            FieldValue::Json(_) => "object",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Json(other),
        }
    }
}
