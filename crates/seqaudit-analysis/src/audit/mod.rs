//! Rule registry, condition gating, dispatch and the finding model.

pub mod condition;
pub mod dispatcher;
pub mod finding;
pub mod registry;

pub use condition::Condition;
pub use dispatcher::{AuditContext, AuditDispatcher, EntityFindings};
pub use finding::{Finding, Severity};
pub use registry::{AuditCheck, CheckResult, RegisteredRule, RuleRegistry};
