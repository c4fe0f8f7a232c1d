//! Findings and severity tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tiers, ordered by escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    NotCompliant,
    Error,
    DccAction,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Warning,
        Severity::NotCompliant,
        Severity::Error,
        Severity::DccAction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::NotCompliant => "NOT_COMPLIANT",
            Self::Error => "ERROR",
            Self::DccAction => "DCC_ACTION",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported compliance issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: String,
    pub detail: String,
    pub severity: Severity,
}

/// Code of the finding emitted when a rule body faults.
pub const RULE_FAILURE_CODE: &str = "audit rule failure";

impl Finding {
    pub fn new(code: impl Into<String>, detail: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
            severity,
        }
    }

    pub fn warning(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(code, detail, Severity::Warning)
    }

    pub fn not_compliant(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(code, detail, Severity::NotCompliant)
    }

    pub fn error(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(code, detail, Severity::Error)
    }

    pub fn dcc_action(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(code, detail, Severity::DccAction)
    }

    /// The single finding standing in for a faulted rule.
    pub fn rule_failure(rule: &str, entity: &str, message: &str) -> Self {
        Self::error(
            RULE_FAILURE_CODE,
            format!("Audit rule {rule} failed on {entity}: {message}"),
        )
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.detail)
    }
}
