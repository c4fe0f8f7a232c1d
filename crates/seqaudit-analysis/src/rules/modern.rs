//! modERN ChIP-seq step-run linkage.

use seqaudit_core::errors::RuleError;
use seqaudit_core::model::relations as rel;
use seqaudit_core::model::DatasetClass;

use crate::audit::{AuditCheck, AuditContext, CheckResult, Finding};
use crate::frame::ResolvedEntity;
use crate::rules::support::{file_record, require, BAM, FASTQ};

/// Assay term of ChIP-seq.
pub const CHIP_SEQ_TERM_ID: &str = "OBI:0000716";

const BAM_STEP: &str = "modern:chip-seq-bwa-alignment-step-run-v-1-virtual";
const PEAKS_STEP: &str = "modern:chip-seq-spp-peak-calling-step-run-v-1-virtual";
const IDR_STEP: &str = "modern:chip-seq-optimal-idr-step-run-v-1-virtual";

/// Output types (or formats) whose step run must be one of two aliases.
struct SignalStep {
    output_type: Option<&'static str>,
    file_format: Option<&'static str>,
    allowed: [&'static str; 2],
    code: &'static str,
    noun: &'static str,
}

const SIGNAL_STEPS: &[SignalStep] = &[
    SignalStep {
        output_type: Some("normalized signal of all reads"),
        file_format: None,
        allowed: [
            "modern:chip-seq-unique-read-signal-generation-step-run-v-1-virtual",
            "modern:chip-seq-replicate-pooled-unique-read-signal-generation-step-run-v-1-virtual",
        ],
        code: "wrong step_run for unique signal",
        noun: "Normalized signal of all reads",
    },
    SignalStep {
        output_type: Some("read-depth normalized signal"),
        file_format: None,
        allowed: [
            "modern:chip-seq-read-depth-normalized-signal-generation-step-run-v-1-virtual",
            "modern:chip-seq-replicate-pooled-read-depth-normalized-signal-generation-step-run-v-1-virtual",
        ],
        code: "wrong step_run for depth signal",
        noun: "Read depth normalized signal",
    },
    SignalStep {
        output_type: Some("control normalized signal"),
        file_format: None,
        allowed: [
            "modern:chip-seq-control-normalized-signal-generation-step-run-v-1-virtual",
            "modern:chip-seq-replicate-pooled-control-normalized-signal-generation-step-run-v-1-virtual",
        ],
        code: "wrong step_run for control signal",
        noun: "Control normalized signal",
    },
    SignalStep {
        output_type: None,
        file_format: Some("bigBed"),
        allowed: [
            "modern:chip-seq-peaks-to-bigbed-step-run-v-1-virtual",
            "modern:chip-seq-optimal-idr-thresholded-peaks-to-bigbed-step-run-v-1-virtual",
        ],
        code: "wrong step_run for bigBed peaks",
        noun: "bigBed",
    },
];

/// `file_modern_chip_pipeline_steps`: modERN ChIP-seq files must link to
/// the step run that produced them.
///
/// The signal and bigBed alias checks are gated by
/// `Standards::check_signal_step_runs`. Historically these comparisons were
/// written so they could never fire; when enabled they test membership in
/// the two accepted aliases.
pub struct ModernChipStepsCheck;

impl ModernChipStepsCheck {
    pub const NAME: &'static str = "file_modern_chip_pipeline_steps";
}

impl AuditCheck for ModernChipStepsCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        let dataset = require(Self::NAME, value, rel::DATASET)?;
        let is_chip_experiment = dataset.as_dataset().is_some_and(|d| {
            d.dataset_class == DatasetClass::Experiment
                && d.assay_term_id.as_deref() == Some(CHIP_SEQ_TERM_ID)
        });
        if !is_chip_experiment {
            return Ok(Vec::new());
        }

        if file.file_format == FASTQ {
            if file.step_run.is_some() {
                return Ok(vec![Finding::error(
                    "unexpected step_run",
                    format!("Fastq file {} should not have an associated step_run", value.id),
                )]);
            }
            return Ok(Vec::new());
        }

        if file.step_run.is_none() {
            return Ok(vec![Finding::warning(
                "missing step_run",
                format!("File {} is missing a step_run", value.id),
            )]);
        }
        let step = require(Self::NAME, value, rel::STEP_RUN)?;

        let mut findings = Vec::new();
        if file.derived_from.is_empty() {
            findings.push(Finding::warning(
                "missing derived_from",
                format!("File {} is missing its derived_from", value.id),
            ));
        }

        let alias = step
            .as_step_run()
            .and_then(|s| s.aliases.first())
            .map(String::as_str)
            .ok_or_else(|| RuleError::MalformedValue {
                rule: Self::NAME,
                entity: step.id.to_string(),
                field: "aliases".to_string(),
                message: "step run has no aliases".to_string(),
            })?;
        let wrong = |noun: &str| format!("{noun} {} is linked to the wrong step_run: {alias}", value.id);

        if file.file_format == BAM && alias != BAM_STEP {
            findings.push(Finding::warning("wrong step_run ChIP-seq bam", wrong("Bam")));
        }

        if ctx.standards.check_signal_step_runs {
            for step_rule in SIGNAL_STEPS {
                let matches = step_rule.output_type.is_some_and(|o| o == file.output_type)
                    || step_rule.file_format.is_some_and(|f| f == file.file_format);
                if matches && !step_rule.allowed.contains(&alias) {
                    findings.push(Finding::warning(step_rule.code, wrong(step_rule.noun)));
                }
            }
        }

        let narrow_peak_bed =
            file.file_format == "bed" && file.file_format_type.as_deref() == Some("narrowPeak");
        if narrow_peak_bed && file.output_type == "peaks" && alias != PEAKS_STEP {
            findings.push(Finding::warning("wrong step_run for peaks", wrong("Peaks")));
        }
        if narrow_peak_bed && file.output_type == "optimal idr thresholded peaks" && alias != IDR_STEP {
            findings.push(Finding::warning(
                "wrong step_run for IDR peaks",
                wrong("Optimal IDR thresholded peaks"),
            ));
        }
        Ok(findings)
    }
}
