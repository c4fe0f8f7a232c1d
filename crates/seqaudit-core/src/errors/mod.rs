//! Error handling for seqaudit.
//! One error enum per subsystem, `thiserror` only.

pub mod audit_error;
pub mod config_error;
pub mod error_code;
pub mod graph_error;
pub mod rule_error;
pub mod upgrade_error;

pub use audit_error::{AuditError, BatchResult};
pub use config_error::ConfigError;
pub use error_code::AuditErrorCode;
pub use graph_error::GraphError;
pub use rule_error::RuleError;
pub use upgrade_error::UpgradeError;
