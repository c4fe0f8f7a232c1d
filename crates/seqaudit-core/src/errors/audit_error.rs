//! Top-level audit errors and non-fatal error collection.

use super::error_code::AuditErrorCode;
use super::{ConfigError, GraphError, RuleError, UpgradeError};

/// Errors that can occur while running an audit batch.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Upgrade error: {0}")]
    Upgrade(#[from] UpgradeError),
}

impl AuditErrorCode for AuditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Rule(e) => e.error_code(),
            Self::Upgrade(e) => e.error_code(),
        }
    }
}

/// Result of a batch run that accumulates non-fatal errors.
/// Partial results are returned even when some entities cannot be audited.
#[derive(Debug, Default)]
pub struct BatchResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<AuditError>,
}

impl<T: Default> BatchResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<AuditError>) {
        self.errors.push(error.into());
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
