//! Read-depth standards for processed alignments.
//!
//! The rule walks the provenance graph beyond the file itself: it resolves
//! the producing pipeline, extracts a depth from the attached quality
//! metrics, locates the paired control alignment through the shared
//! upstream reads and classifies both against the tiered tables.

pub mod classify;
pub mod control;
pub mod read_depth;

use seqaudit_core::model::relations as rel;

use crate::audit::{AuditCheck, AuditContext, CheckResult, Finding};
use crate::frame::{Frame, ResolvedEntity};
use crate::rules::support::{
    file_record, is_processed_alignment, software_titles, target_name, StepChain, FASTQ,
};

pub use classify::{classify_chip_depth, classify_flat_depth, DepthRole, DepthSubject};
pub use control::find_control_alignment;
pub use read_depth::{compute_read_depth, matched_pipeline, DepthReading};

/// Relations the read-depth rule needs embedded, including the control side.
pub const READ_DEPTH_FRAME: &[&str] = &[
    "quality_metrics",
    "analysis_step_version",
    "analysis_step_version.analysis_step",
    "analysis_step_version.analysis_step.pipelines",
    "analysis_step_version.software_versions",
    "analysis_step_version.software_versions.software",
    "dataset",
    "dataset.target",
    "derived_from",
    "derived_from.controlled_by",
    "derived_from.controlled_by.dataset",
    "derived_from.controlled_by.dataset.target",
    "derived_from.controlled_by.dataset.original_files",
    "derived_from.controlled_by.dataset.original_files.quality_metrics",
    "derived_from.controlled_by.dataset.original_files.dataset",
    "derived_from.controlled_by.dataset.original_files.dataset.target",
    "derived_from.controlled_by.dataset.original_files.derived_from",
    "derived_from.controlled_by.dataset.original_files.analysis_step_version",
    "derived_from.controlled_by.dataset.original_files.analysis_step_version.analysis_step",
    "derived_from.controlled_by.dataset.original_files.analysis_step_version.analysis_step.pipelines",
    "derived_from.controlled_by.dataset.original_files.analysis_step_version.software_versions",
    "derived_from.controlled_by.dataset.original_files.analysis_step_version.software_versions.software",
];

pub fn read_depth_frame() -> Frame {
    Frame::new(READ_DEPTH_FRAME)
}

/// `file_read_depth`: processed alignments must meet the depth standards.
pub struct ReadDepthCheck;

impl ReadDepthCheck {
    pub const NAME: &'static str = "file_read_depth";
}

impl AuditCheck for ReadDepthCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, ctx: &AuditContext<'_>) -> CheckResult {
        let standards = ctx.standards;
        let file = file_record(Self::NAME, value)?;
        if !is_processed_alignment(file, &standards.processing_lab) {
            return Ok(Vec::new());
        }
        const NOUN: &str = "alignment file";

        let chain = match StepChain::resolve(value) {
            Ok(chain) => chain,
            Err(gap) => return Ok(vec![gap.finding(value, NOUN)]),
        };
        let software = match chain.software_versions() {
            Ok(software) => software,
            Err(gap) => return Ok(vec![gap.finding(value, NOUN)]),
        };
        if software_titles(software).any(|title| standards.is_excluded_software(title)) {
            tracing::debug!(file = %value.id, "excluded software, depth not audited");
            return Ok(Vec::new());
        }

        if value.many(rel::QUALITY_METRICS).is_empty() {
            if chain
                .pipeline_titles()
                .any(|title| standards.is_unfiltered_pipeline(title))
            {
                return Ok(Vec::new());
            }
            return Ok(vec![Finding::dcc_action(
                "missing quality metrics",
                format!("ENCODE Processed {NOUN} {} has no quality_metrics", value.id),
            )]);
        }

        if file.derived_from.is_empty() {
            return Ok(vec![Finding::dcc_action(
                "missing derived_from files",
                format!("ENCODE Processed {NOUN} {} has no derived_from files", value.id),
            )]);
        }

        let mut findings = Vec::new();
        let run_type_known = value
            .many(rel::DERIVED_FROM)
            .iter()
            .filter_map(|upstream| upstream.as_file())
            .filter(|f| f.file_format == FASTQ)
            .any(|f| f.run_type.is_some());
        if !run_type_known {
            findings.push(Finding::dcc_action(
                "missing run_type in derived_from files",
                format!(
                    "ENCODE Processed {NOUN} {} has no run_type in derived_from files",
                    value.id
                ),
            ));
        }

        let Some(reading) = compute_read_depth(value, standards, Self::NAME)? else {
            findings.push(Finding::dcc_action(
                "missing read depth",
                format!(
                    "ENCODE Processed {NOUN} {} has no read depth information",
                    value.id
                ),
            ));
            return Ok(findings);
        };

        let dataset = value.one(rel::DATASET);
        let target = target_name(value);

        if !standards.is_tiered_pipeline(&reading.pipeline) {
            let assay = dataset
                .and_then(|d| d.as_dataset())
                .and_then(|d| d.assay_term_name.as_deref());
            findings.extend(classify_flat_depth(
                value.id.as_str(),
                reading.depth,
                &reading.pipeline,
                assay,
                standards,
            ));
            return Ok(findings);
        }

        let subject = DepthSubject {
            file: value.id.as_str(),
            dataset: dataset.map(|d| d.id.as_str()),
            depth: reading.depth,
            target,
        };
        findings.extend(classify_chip_depth(&subject, DepthRole::Experiment, standards));

        if target.is_some_and(|t| standards.is_control_target(t)) {
            return Ok(findings);
        }
        let Some(control) = find_control_alignment(value, &reading.pipeline) else {
            tracing::debug!(file = %value.id, "no control alignment located");
            return Ok(findings);
        };
        // A bad control reading only drops the control comparison.
        let control_depth = match compute_read_depth(control, standards, Self::NAME) {
            Ok(reading) => reading,
            Err(error) => {
                tracing::warn!(
                    file = %value.id,
                    control = %control.id,
                    error = %error,
                    "control read depth unusable, control not judged"
                );
                None
            }
        };
        let control_target = target_name(control);
        if let (Some(control_reading), Some(control_target)) = (control_depth, control_target) {
            let control_subject = DepthSubject {
                file: control.id.as_str(),
                dataset: control.one(rel::DATASET).map(|d| d.id.as_str()),
                depth: control_reading.depth,
                target: Some(control_target),
            };
            findings.extend(classify_chip_depth(
                &control_subject,
                DepthRole::Control {
                    paired_target: target,
                },
                standards,
            ));
        }
        Ok(findings)
    }
}
