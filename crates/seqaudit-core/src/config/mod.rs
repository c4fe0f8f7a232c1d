//! Configuration system for seqaudit.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod audit_config;
pub mod batch_config;
pub mod rule_config;
pub mod standards;
pub mod standards_config;

pub use audit_config::{AuditConfig, CliOverrides};
pub use batch_config::BatchConfig;
pub use rule_config::RuleConfig;
pub use standards::{DepthRequirement, Standards};
pub use standards_config::StandardsConfig;
