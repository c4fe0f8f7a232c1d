//! Audit engine for sequencing provenance graphs.
//!
//! Rules are registered per entity kind together with the frame (relation
//! paths) they need and the funding categories they apply to. The
//! dispatcher resolves each rule's frame, gates it on its condition, runs
//! it in isolation and collects the findings.

pub mod audit;
pub mod frame;
pub mod reporters;
pub mod rules;
pub mod upgrade;

pub use audit::{
    AuditCheck, AuditContext, AuditDispatcher, CheckResult, Condition, EntityFindings, Finding,
    RuleRegistry, Severity,
};
pub use frame::{DotPath, Frame, FrameResolver, ResolvedEntity};
pub use reporters::{create_reporter, AuditReport, Reporter};
pub use rules::standard_registry;
pub use upgrade::{standard_upgrades, UpgradeRegistry};
