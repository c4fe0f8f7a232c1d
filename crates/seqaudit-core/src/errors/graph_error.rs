//! Provenance graph errors.

use super::error_code::{self, AuditErrorCode};

/// Errors raised by the provenance graph collaborator.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Failed to decode entities: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AuditErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        error_code::GRAPH_ERROR
    }
}
