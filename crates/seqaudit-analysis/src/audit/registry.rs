//! Explicit rule table, keyed by entity kind.

use std::collections::BTreeMap;

use seqaudit_core::config::RuleConfig;
use seqaudit_core::errors::RuleError;
use seqaudit_core::model::{EntityKind, Status};

use super::condition::Condition;
use super::dispatcher::AuditContext;
use super::finding::Finding;
use crate::frame::{Frame, ResolvedEntity};

/// Outcome of one rule invocation. An early return after some findings is
/// normal termination, not an error.
pub type CheckResult = Result<Vec<Finding>, RuleError>;

/// A rule body.
pub trait AuditCheck: Send + Sync {
    /// Stable rule name, used for config overrides and fault findings.
    fn name(&self) -> &'static str;

    /// Statuses for which the rule is skipped without running.
    fn skipped_statuses(&self) -> &'static [Status] {
        Status::RETIRED
    }

    fn check(&self, value: &ResolvedEntity, ctx: &AuditContext<'_>) -> CheckResult;
}

/// One row of the rule table.
pub struct RegisteredRule {
    pub frame: Frame,
    pub condition: Condition,
    pub check: Box<dyn AuditCheck>,
}

impl RegisteredRule {
    pub fn name(&self) -> &'static str {
        self.check.name()
    }
}

/// Rules per entity kind, in registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: BTreeMap<EntityKind, Vec<RegisteredRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: EntityKind,
        frame: Frame,
        condition: Condition,
        check: Box<dyn AuditCheck>,
    ) -> &mut Self {
        self.rules.entry(kind).or_default().push(RegisteredRule {
            frame,
            condition,
            check,
        });
        self
    }

    /// Register a rule unless disabled, applying any funding-category override.
    pub fn register_configured(
        &mut self,
        config: &RuleConfig,
        kind: EntityKind,
        frame: Frame,
        condition: Condition,
        check: Box<dyn AuditCheck>,
    ) -> &mut Self {
        let name = check.name();
        if config.is_disabled(name) {
            tracing::debug!(rule = name, "rule disabled by configuration");
            return self;
        }
        let condition = match config.categories_for(name) {
            Some(categories) => Condition::FundingCategory(categories.to_vec()),
            None => condition,
        };
        self.register(kind, frame, condition, check)
    }

    pub fn rules_for(&self, kind: EntityKind) -> &[RegisteredRule] {
        self.rules.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rule names for `kind`, in registration order.
    pub fn names(&self, kind: EntityKind) -> Vec<&'static str> {
        self.rules_for(kind).iter().map(RegisteredRule::name).collect()
    }
}
