//! Rule dispatch: frame, condition, isolated invocation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use seqaudit_core::config::{BatchConfig, Standards};
use seqaudit_core::errors::{BatchResult, GraphError, RuleError};
use seqaudit_core::graph::ProvenanceGraph;
use seqaudit_core::model::{Entity, EntityId};

use super::finding::Finding;
use super::registry::{RegisteredRule, RuleRegistry};
use crate::frame::FrameResolver;

/// Read-only state shared by every rule invocation.
#[derive(Clone, Copy)]
pub struct AuditContext<'a> {
    pub graph: &'a dyn ProvenanceGraph,
    pub standards: &'a Standards,
}

/// Findings for one entity, in rule registration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityFindings {
    pub id: EntityId,
    pub findings: Vec<Finding>,
}

/// Evaluates registered rules against entities.
pub struct AuditDispatcher {
    registry: RuleRegistry,
    standards: Standards,
    batch: BatchConfig,
}

impl AuditDispatcher {
    pub fn new(registry: RuleRegistry, standards: Standards) -> Self {
        Self {
            registry,
            standards,
            batch: BatchConfig::default(),
        }
    }

    pub fn with_batch_config(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn standards(&self) -> &Standards {
        &self.standards
    }

    /// Run every rule registered for the entity's kind.
    pub fn evaluate(&self, graph: &dyn ProvenanceGraph, entity: &Arc<Entity>) -> Vec<Finding> {
        let ctx = AuditContext {
            graph,
            standards: &self.standards,
        };
        let resolver = FrameResolver::new(graph);
        let mut findings = Vec::new();
        for rule in self.registry.rules_for(entity.kind()) {
            findings.extend(self.run_rule(rule, entity, &resolver, &ctx));
        }
        findings
    }

    fn run_rule(
        &self,
        rule: &RegisteredRule,
        entity: &Arc<Entity>,
        resolver: &FrameResolver<'_>,
        ctx: &AuditContext<'_>,
    ) -> Vec<Finding> {
        let name = rule.name();
        if rule.check.skipped_statuses().contains(&entity.status) {
            tracing::trace!(entity = %entity.id, rule = name, status = %entity.status, "status skipped");
            return Vec::new();
        }
        if !rule.condition.applies(entity, ctx.graph) {
            tracing::debug!(entity = %entity.id, rule = name, "condition not met");
            return Vec::new();
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let value = resolver.resolve(Arc::clone(entity), &rule.frame);
            rule.check.check(&value, ctx)
        }));

        let error = match outcome {
            Ok(Ok(findings)) => return findings,
            Ok(Err(error)) => error,
            Err(payload) => RuleError::Panicked {
                rule: name.to_string(),
                message: panic_message(payload.as_ref()),
            },
        };
        tracing::warn!(entity = %entity.id, rule = name, error = %error, "audit rule failed");
        vec![Finding::rule_failure(name, entity.id.as_str(), &error.to_string())]
    }

    /// Evaluate many entities, in parallel unless disabled. Output order
    /// follows `ids`; unknown identifiers are reported as non-fatal errors.
    pub fn evaluate_all(
        &self,
        graph: &dyn ProvenanceGraph,
        ids: &[EntityId],
    ) -> BatchResult<Vec<EntityFindings>> {
        let run_one = |id: &EntityId| -> Result<EntityFindings, GraphError> {
            let entity = graph
                .get(id)
                .ok_or_else(|| GraphError::UnknownEntity(id.to_string()))?;
            Ok(EntityFindings {
                id: id.clone(),
                findings: self.evaluate(graph, &entity),
            })
        };

        let outcomes: Vec<Result<EntityFindings, GraphError>> = if self.batch.effective_parallel() {
            match self.batch.threads {
                Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => pool.install(|| ids.par_iter().map(run_one).collect()),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to build thread pool, using global pool");
                        ids.par_iter().map(run_one).collect()
                    }
                },
                None => ids.par_iter().map(run_one).collect(),
            }
        } else {
            ids.iter().map(run_one).collect()
        };

        let mut result = BatchResult::new(Vec::with_capacity(ids.len()));
        for outcome in outcomes {
            match outcome {
                Ok(entry) => result.data.push(entry),
                Err(e) => result.add_error(e),
            }
        }
        let finding_count: usize = result.data.iter().map(|e| e.findings.len()).sum();
        tracing::info!(
            entities = result.data.len(),
            findings = finding_count,
            errors = result.error_count(),
            "audit batch complete"
        );
        result
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
