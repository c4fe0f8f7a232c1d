//! Read-depth extraction for processed alignments.

use seqaudit_core::config::Standards;
use seqaudit_core::errors::RuleError;
use seqaudit_core::model::relations as rel;
use seqaudit_core::model::QualityMetricRecord;

use crate::frame::ResolvedEntity;
use crate::rules::support::{is_processed_alignment, StepChain};

/// Metric holding usable fragments for the tiered pipeline.
pub const TOTAL_METRIC: &str = "total";
/// Metric holding read depth for every other qualifying pipeline.
pub const UNIQUELY_MAPPED_METRIC: &str = "Uniquely mapped reads number";
const READ1: &str = "read1";
const READ2: &str = "read2";

/// A usable read depth and the pipeline it was measured under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthReading {
    pub pipeline: String,
    pub depth: u64,
}

/// First pipeline of the chain that carries a depth requirement.
pub fn matched_pipeline<'a>(chain: &StepChain<'a>, standards: &Standards) -> Option<&'a str> {
    chain
        .pipeline_titles()
        .find(|title| standards.has_depth_requirement(title))
}

/// Read depth of `file`, or `None` when the file does not qualify or no
/// usable reading exists. A zero reading counts as no reading.
///
/// Paired-end tiered metrics (carrying `read1` and `read2`) count each pair
/// twice, so the raw total is halved.
pub fn compute_read_depth(
    file: &ResolvedEntity,
    standards: &Standards,
    rule: &'static str,
) -> Result<Option<DepthReading>, RuleError> {
    let Some(record) = file.as_file() else {
        return Ok(None);
    };
    if file.status.is_retired() || !is_processed_alignment(record, &standards.processing_lab) {
        return Ok(None);
    }
    let Ok(chain) = StepChain::resolve(file) else {
        return Ok(None);
    };
    if chain.software_versions().is_err() {
        return Ok(None);
    }
    let metrics = file.many(rel::QUALITY_METRICS);
    if metrics.is_empty() {
        return Ok(None);
    }
    let Some(pipeline) = matched_pipeline(&chain, standards) else {
        return Ok(None);
    };
    if record.derived_from.is_empty() {
        return Ok(None);
    }

    let tiered = standards.is_tiered_pipeline(pipeline);
    let metric_name = if tiered { TOTAL_METRIC } else { UNIQUELY_MAPPED_METRIC };
    let Some(metric) = metrics
        .iter()
        .filter_map(|m| m.as_quality_metric())
        .find(|m| m.contains(metric_name))
    else {
        return Ok(None);
    };

    let raw = metric_count(metric, metric_name, file, rule)?;
    let depth = if tiered && metric.contains(READ1) && metric.contains(READ2) {
        raw / 2
    } else {
        raw
    };
    if depth == 0 {
        return Ok(None);
    }
    tracing::trace!(file = %file.id, pipeline, depth, "read depth extracted");
    Ok(Some(DepthReading {
        pipeline: pipeline.to_string(),
        depth,
    }))
}

fn metric_count(
    metric: &QualityMetricRecord,
    name: &str,
    file: &ResolvedEntity,
    rule: &'static str,
) -> Result<u64, RuleError> {
    let value = metric.get(name);
    value
        .and_then(|v| v.as_count())
        .ok_or_else(|| RuleError::MalformedValue {
            rule,
            entity: file.id.to_string(),
            field: name.to_string(),
            message: format!("expected a read count, found {value:?}"),
        })
}
