//! Library complexity of histone ChIP-seq alignments.

use seqaudit_core::errors::RuleError;
use seqaudit_core::model::relations as rel;
use seqaudit_core::model::MetricValue;

use crate::audit::{AuditCheck, AuditContext, CheckResult, Finding};
use crate::frame::{Frame, ResolvedEntity};
use crate::rules::support::{file_record, is_processed_alignment, StepChain};

/// Shared by the library complexity and replicate concordance rules.
pub const QC_FRAME: &[&str] = &[
    "quality_metrics",
    "analysis_step_version",
    "analysis_step_version.analysis_step",
    "analysis_step_version.analysis_step.pipelines",
    "analysis_step_version.software_versions",
    "analysis_step_version.software_versions.software",
    "dataset",
];

pub fn qc_frame() -> Frame {
    Frame::new(QC_FRAME)
}

/// Lower bounds for one complexity metric: below `insufficient` is not
/// compliant, at or below `low` is a warning.
struct ComplexityBounds {
    metric: &'static str,
    insufficient: f64,
    low: f64,
    explanation: &'static str,
}

const BOUNDS: [ComplexityBounds; 3] = [
    ComplexityBounds {
        metric: "NRF",
        insufficient: 0.8,
        low: 0.9,
        explanation: "Non redundant fraction (NRF, Number of reads after removing duplicates / \
                      Total number of reads). 0.0-0.7 is very poor complexity, 0.7-0.8 is poor \
                      complexity, 0.8-0.9 moderate complexity, and >0.9 high complexity. NRF >0.9 \
                      is recommended, but >0.8 is acceptable",
    },
    ComplexityBounds {
        metric: "PBC1",
        insufficient: 0.8,
        low: 0.9,
        explanation: "PCR Bottlenecking coefficient 1 (PBC1, Number of genomic locations where \
                      exactly one read maps uniquely/Number of distinct genomic locations to which \
                      some read maps uniquely). 0 - 0.5 is severe bottlenecking, 0.5 - 0.8 is \
                      moderate bottlenecking, 0.8 - 0.9 is mild bottlenecking, and > 0.9 is no \
                      bottlenecking. PBC1 >0.9 is recommended, but >0.8 is acceptable",
    },
    ComplexityBounds {
        metric: "PBC2",
        insufficient: 3.0,
        low: 10.0,
        explanation: "PCR Bottlenecking coefficient 2 (PBC2, Number of genomic locations where \
                      only one read maps uniquely/Number of genomic locations where 2 reads map \
                      uniquely). 0 - 1 is severe bottlenecking, 1 - 3 is moderate bottlenecking, \
                      3 -10 is mild bottlenecking, > 10 is no bottlenecking. PBC2 >10 is \
                      recommended, but >3 is acceptable",
    },
];

impl ComplexityBounds {
    fn classify(&self, file: &str, value: f64) -> Option<Finding> {
        let detail = || {
            format!(
                "ENCODE Processed alignment file {file} was generated from a library with {} \
                 value of {value}. {}",
                self.metric, self.explanation
            )
        };
        if value < self.insufficient {
            Some(Finding::not_compliant("insufficient library complexity", detail()))
        } else if value <= self.low {
            Some(Finding::warning("low library complexity", detail()))
        } else {
            None
        }
    }
}

/// `file_chip_seq_library_complexity`: NRF, PBC1 and PBC2 bounds.
pub struct LibraryComplexityCheck;

impl LibraryComplexityCheck {
    pub const NAME: &'static str = "file_chip_seq_library_complexity";
}

impl AuditCheck for LibraryComplexityCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, ctx: &AuditContext<'_>) -> CheckResult {
        let standards = ctx.standards;
        let file = file_record(Self::NAME, value)?;
        if !is_processed_alignment(file, &standards.processing_lab) {
            return Ok(Vec::new());
        }
        let metrics = value.many(rel::QUALITY_METRICS);
        if metrics.is_empty() {
            return Ok(Vec::new());
        }
        let Ok(chain) = StepChain::resolve(value) else {
            return Ok(Vec::new());
        };
        if !chain.has_pipeline(&standards.tiered_pipeline) {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for metric in metrics.iter().filter_map(|m| m.as_quality_metric()) {
            for bounds in &BOUNDS {
                let Some(raw) = metric.get(bounds.metric) else {
                    continue;
                };
                let measured = metric_f64(raw, bounds.metric, value)?;
                findings.extend(bounds.classify(value.id.as_str(), measured));
            }
        }
        Ok(findings)
    }
}

fn metric_f64(raw: &MetricValue, name: &str, file: &ResolvedEntity) -> Result<f64, RuleError> {
    raw.as_f64().ok_or_else(|| RuleError::MalformedValue {
        rule: LibraryComplexityCheck::NAME,
        entity: file.id.to_string(),
        field: name.to_string(),
        message: format!("expected a number, found {raw:?}"),
    })
}
