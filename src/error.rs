//! Host-level error type.
//!
//! Validation findings are never errors; they are reported as
//! [`Issue`](crate::validate::Issue) values. This type only covers input that
//! cannot be read at all and the topological sort failure.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Workflow or catalog JSON could not be deserialized.
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The graph has at least one cycle, so no execution order exists.
    #[error("workflow graph contains a cycle: {}", .path.join(" → "))]
    Cycle { path: Vec<String> },
}

impl Error {
    /// Stable machine-readable code, used by the wasm bindings.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Parse(_) => "PARSE_ERROR",
            Error::Cycle { .. } => "CYCLE",
        }
    }
}
