//! Replicate identity and mate pairing.

use seqaudit_core::model::relations as rel;

use crate::audit::{AuditCheck, AuditContext, CheckResult, Finding};
use crate::frame::ResolvedEntity;
use crate::rules::support::{file_record, require};

/// `file_biological_replicate_number_match`: a file's replicate identity
/// must match every same-experiment file it was derived from.
pub struct BiologicalReplicateMatchCheck;

impl BiologicalReplicateMatchCheck {
    pub const NAME: &'static str = "file_biological_replicate_number_match";
}

impl AuditCheck for BiologicalReplicateMatchCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let Some(replicate) = value.one(rel::REPLICATE) else {
            return Ok(Vec::new());
        };
        let upstream = value.many(rel::DERIVED_FROM);
        if upstream.is_empty() {
            return Ok(Vec::new());
        }
        let Some(identity) = replicate.as_replicate().map(|r| r.identity()) else {
            return Ok(Vec::new());
        };
        let experiment = &require(Self::NAME, replicate, rel::EXPERIMENT)?.id;

        for parent in upstream {
            let Some(parent_replicate) = parent.one(rel::REPLICATE) else {
                continue;
            };
            // Controls come from other experiments.
            let parent_experiment = require(Self::NAME, parent_replicate, rel::EXPERIMENT)?;
            if &parent_experiment.id != experiment {
                continue;
            }
            let Some(parent_identity) = parent_replicate.as_replicate().map(|r| r.identity())
            else {
                continue;
            };
            if parent_identity != identity {
                return Ok(vec![Finding::error(
                    "inconsistent biological replicate number",
                    format!(
                        "Biological replicate number of the file {} is {identity:?}, it is \
                         inconsistent with the biological replicate number {parent_identity:?} \
                         of the file {} it was derived from",
                        value.id, parent.id
                    ),
                )]);
            }
        }
        Ok(Vec::new())
    }
}

/// `file_replicate_match`: a file's replicate must belong to the file's dataset.
pub struct ReplicateMatchCheck;

impl ReplicateMatchCheck {
    pub const NAME: &'static str = "file_replicate_match";
}

impl AuditCheck for ReplicateMatchCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let Some(replicate) = value.one(rel::REPLICATE) else {
            return Ok(Vec::new());
        };
        let replicate_experiment = require(Self::NAME, replicate, rel::EXPERIMENT)?;
        let dataset = require(Self::NAME, value, rel::DATASET)?;
        if replicate_experiment.id == dataset.id {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::error(
            "mismatched replicate",
            format!(
                "File {} has a replicate {} in experiment {}",
                value.id, replicate.id, replicate_experiment.id
            ),
        )])
    }
}

/// `file_paired_with`: paired-end files need a mate from the same replicate,
/// and a first read may be claimed by one mate only.
pub struct PairedWithCheck;

impl PairedWithCheck {
    pub const NAME: &'static str = "file_paired_with";
}

impl AuditCheck for PairedWithCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        let Some(paired_end) = file.paired_end.as_deref() else {
            return Ok(Vec::new());
        };
        if file.paired_with.is_none() {
            return Ok(vec![Finding::error(
                "missing paired_with",
                format!(
                    "File {} has paired_end = {paired_end}. It requires a paired file",
                    value.id
                ),
            )]);
        }
        let mate = require(Self::NAME, value, rel::PAIRED_WITH)?;

        let Some(mate_replicate) = mate.as_file().and_then(|m| m.replicate.as_ref()) else {
            return Ok(Vec::new());
        };
        let Some(replicate) = file.replicate.as_ref() else {
            return Ok(vec![Finding::dcc_action(
                "missing replicate",
                format!(
                    "File {} has paired_end = {paired_end}. It requires a replicate",
                    value.id
                ),
            )]);
        };
        if replicate != mate_replicate {
            return Ok(vec![Finding::error(
                "mismatched paired_with",
                format!(
                    "File {} has replicate {replicate}. It is paired_with file {} with replicate \
                     {mate_replicate}",
                    value.id, mate.id
                ),
            )]);
        }

        if paired_end == "1" {
            let claimed_by = ctx.graph.rev_links(&value.id, rel::PAIRED_WITH);
            if claimed_by.len() > 1 {
                let mates: Vec<&str> = claimed_by.iter().map(|id| id.as_str()).collect();
                return Ok(vec![Finding::error(
                    "multiple paired_with",
                    format!(
                        "Paired end 1 file {} paired_with by multiple paired end 2 files: {mates:?}",
                        value.id
                    ),
                )]);
            }
        }
        Ok(Vec::new())
    }
}
