//! Grouping of findings by entity and severity.

use std::collections::BTreeMap;

use serde::Serialize;

use seqaudit_core::model::EntityId;

use crate::audit::{EntityFindings, Finding, Severity};

/// Findings of one entity, grouped by severity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub id: EntityId,
    pub findings: BTreeMap<Severity, Vec<Finding>>,
}

impl EntityReport {
    pub fn total(&self) -> usize {
        self.findings.values().map(Vec::len).sum()
    }
}

/// A batch of audit results, ready for rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    /// Entities with at least one finding, in evaluation order.
    pub entities: Vec<EntityReport>,
    /// Entities evaluated, including clean ones.
    pub evaluated: usize,
    pub counts: BTreeMap<Severity, usize>,
}

impl AuditReport {
    pub fn from_findings(results: &[EntityFindings]) -> Self {
        let mut counts: BTreeMap<Severity, usize> = BTreeMap::new();
        let mut entities = Vec::new();
        for entry in results {
            if entry.findings.is_empty() {
                continue;
            }
            let mut grouped: BTreeMap<Severity, Vec<Finding>> = BTreeMap::new();
            for finding in &entry.findings {
                *counts.entry(finding.severity).or_default() += 1;
                grouped
                    .entry(finding.severity)
                    .or_default()
                    .push(finding.clone());
            }
            entities.push(EntityReport {
                id: entry.id.clone(),
                findings: grouped,
            });
        }
        Self {
            entities,
            evaluated: results.len(),
            counts,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts.get(&severity).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Highest severity present, if any.
    pub fn worst(&self) -> Option<Severity> {
        self.counts.keys().next_back().copied()
    }

    pub fn is_clean(&self) -> bool {
        self.counts.is_empty()
    }
}
