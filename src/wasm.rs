//! WASM entry points for browser use.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::algo::{TopologicalOrder, execution_order, find_cycles};
use crate::error::Error;
use crate::parse::WorkflowGraph;
use crate::schema::StaticCatalog;
use crate::validate::{ValidationResult, ValidatorOptions, WorkflowValidator};

/// Validate a workflow JSON against a schema catalog JSON.
/// Returns a `ValidationResult`, or `{ status: "errors", errors }` when the
/// input cannot be parsed.
#[wasm_bindgen]
pub fn validate_workflow(workflow_json: &str, catalog_json: &str) -> JsValue {
    let result = validate_workflow_inner(workflow_json, catalog_json, None);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Same as `validate_workflow`, with `ValidatorOptions` as JSON.
#[wasm_bindgen]
pub fn validate_workflow_with_options(
    workflow_json: &str,
    catalog_json: &str,
    options_json: &str,
) -> JsValue {
    let result = validate_workflow_inner(workflow_json, catalog_json, Some(options_json));
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_workflow_inner(
    workflow_json: &str,
    catalog_json: &str,
    options_json: Option<&str>,
) -> ValidateResponse {
    let workflow = match crate::parse::parse(workflow_json) {
        Ok(w) => w,
        Err(e) => return ValidateResponse::errors(e),
    };
    let catalog = match StaticCatalog::from_json(catalog_json) {
        Ok(c) => c,
        Err(e) => return ValidateResponse::errors(e),
    };
    let options = match options_json.map(|s| serde_json::from_str::<ValidatorOptions>(s)) {
        None => ValidatorOptions::default(),
        Some(Ok(o)) => o,
        Some(Err(e)) => return ValidateResponse::errors(Error::from(e)),
    };

    let result = WorkflowValidator::new(&catalog)
        .with_options(options)
        .validate(&workflow);
    ValidateResponse::Report(result)
}

/// Topological order of a workflow JSON as `{ success, order, error? }`.
#[wasm_bindgen]
pub fn topological_order(workflow_json: &str) -> JsValue {
    let result = topological_order_inner(workflow_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn topological_order_inner(workflow_json: &str) -> TopologicalOrder {
    let result = crate::parse::parse_and_build(workflow_json)
        .and_then(|(_, graph)| execution_order(&graph));
    TopologicalOrder::from(result)
}

/// Cycle witnesses of a workflow JSON as an array of id arrays.
#[wasm_bindgen]
pub fn detect_cycles(workflow_json: &str) -> JsValue {
    let result = detect_cycles_inner(workflow_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn detect_cycles_inner(workflow_json: &str) -> CyclesResponse {
    match crate::parse::parse(workflow_json) {
        Ok(workflow) => CyclesResponse::Cycles(find_cycles(&WorkflowGraph::build(
            &workflow.nodes,
            &workflow.edges,
        ))),
        Err(e) => CyclesResponse::Errors(vec![ErrorDto::from(e)]),
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct ErrorDto {
    code: String,
    message: String,
}

impl From<Error> for ErrorDto {
    fn from(e: Error) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status")]
enum ValidateResponse {
    #[serde(rename = "report")]
    Report(ValidationResult),
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

impl ValidateResponse {
    fn errors(e: Error) -> Self {
        ValidateResponse::Errors {
            errors: vec![ErrorDto::from(e)],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum CyclesResponse {
    Cycles(Vec<Vec<String>>),
    Errors(Vec<ErrorDto>),
}
