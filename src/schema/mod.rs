//! Node-type schema catalog.
//!
//! A schema lists the configurable fields of one `nodeType` and the
//! constraints each field must satisfy. Catalogs are plain data handed to the
//! validator; unknown node types simply have no schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeTypeSchema {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl NodeTypeSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        NodeTypeSchema { fields }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Allowed values for `select` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.into(),
            label: label.into(),
            required: false,
            field_type,
            validation: None,
            default_value: None,
            options: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(
            values
                .into_iter()
                .map(|v| {
                    let value = v.into();
                    SelectOption {
                        label: value.clone(),
                        value,
                    }
                })
                .collect(),
        );
        self
    }

    /// Label for messages; falls back to the field name.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Boolean,
    Select,
    Json,
    Code,
    Cron,
    Url,
    Email,
    Expression,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// Schema lookup by `nodeType`.
pub trait SchemaCatalog {
    fn schema(&self, node_type: &str) -> Option<&NodeTypeSchema>;
}

impl SchemaCatalog for HashMap<String, NodeTypeSchema> {
    fn schema(&self, node_type: &str) -> Option<&NodeTypeSchema> {
        self.get(node_type)
    }
}

/// An in-memory catalog, typically loaded once from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    schemas: HashMap<String, NodeTypeSchema>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "<nodeType>": { "fields": [...] }, ... }`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, node_type: impl Into<String>, schema: NodeTypeSchema) {
        self.schemas.insert(node_type.into(), schema);
    }

    pub fn with(mut self, node_type: impl Into<String>, schema: NodeTypeSchema) -> Self {
        self.insert(node_type, schema);
        self
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaCatalog for StaticCatalog {
    fn schema(&self, node_type: &str) -> Option<&NodeTypeSchema> {
        self.schemas.get(node_type)
    }
}
