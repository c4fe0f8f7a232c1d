//! Rule execution faults.

use super::error_code::{self, AuditErrorCode};

/// Faults raised from inside a rule body.
///
/// The dispatcher never propagates these; each one becomes a single
/// `ERROR` finding naming the rule.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Rule {rule} expected {relation} to be resolved on {entity}")]
    UnresolvedRelation {
        rule: &'static str,
        entity: String,
        relation: String,
    },

    #[error("Rule {rule} found a malformed value for {field} on {entity}: {message}")]
    MalformedValue {
        rule: &'static str,
        entity: String,
        field: String,
        message: String,
    },

    #[error("Rule {rule} panicked: {message}")]
    Panicked { rule: String, message: String },
}

impl AuditErrorCode for RuleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Panicked { .. } => error_code::RULE_PANIC,
            _ => error_code::RULE_ERROR,
        }
    }
}
