//! Stable error codes shared by every subsystem error.

/// Maps an error to a stable, machine-readable code.
pub trait AuditErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const GRAPH_ERROR: &str = "GRAPH_ERROR";
pub const RULE_ERROR: &str = "RULE_ERROR";
pub const RULE_PANIC: &str = "RULE_PANIC";
pub const UPGRADE_ERROR: &str = "UPGRADE_ERROR";
