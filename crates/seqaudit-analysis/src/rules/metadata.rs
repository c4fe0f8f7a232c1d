//! Control linkage and attached documents.

use seqaudit_core::model::relations as rel;

use crate::audit::{AuditCheck, AuditContext, CheckResult, Finding};
use crate::frame::ResolvedEntity;
use crate::rules::support::{file_record, require, FASTQ};

/// Assays whose reads must name their controls.
pub const CONTROLLED_ASSAYS: &[&str] = &[
    "ChIP-seq",
    "RAMPAGE",
    "CAGE",
    "shRNA knockdown followed by RNA-seq",
];
const FORMAT_SPECIFICATION: &str = "file format specification";

/// `file_controlled_by`: reads from controlled assays need matching controls.
pub struct ControlledByCheck;

impl ControlledByCheck {
    pub const NAME: &'static str = "file_controlled_by";
}

impl AuditCheck for ControlledByCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        let dataset_entity = require(Self::NAME, value, rel::DATASET)?;
        let Some(dataset) = dataset_entity.as_dataset() else {
            return Ok(Vec::new());
        };
        let assay = dataset.assay_term_name.as_deref().unwrap_or_default();
        if !CONTROLLED_ASSAYS.contains(&assay) {
            return Ok(Vec::new());
        }
        let target_is_control = dataset_entity
            .one(rel::TARGET)
            .and_then(|t| t.as_target())
            .is_some_and(|t| t.investigated_as.iter().any(|i| i == "control"));
        if target_is_control {
            return Ok(Vec::new());
        }

        let controls = value.many(rel::CONTROLLED_BY);
        if controls.is_empty() {
            if file.file_format == FASTQ {
                return Ok(vec![Finding::error(
                    "missing controlled_by",
                    format!("Fastq file {} from {assay} requires controlled_by", value.id),
                )]);
            }
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for control in controls {
            let Some(control_file) = control.as_file() else {
                continue;
            };
            let control_dataset = require(Self::NAME, control, rel::DATASET)?;
            let control_biosample = control_dataset
                .as_dataset()
                .and_then(|d| d.biosample_term_id.as_deref());

            if control_biosample != dataset.biosample_term_id.as_deref() {
                findings.push(Finding::error(
                    "mismatched controlled_by",
                    format!(
                        "File {} has a controlled_by file {} with conflicting biosample {}",
                        value.id,
                        control.id,
                        control_biosample.unwrap_or("None")
                    ),
                ));
                return Ok(findings);
            }
            if control_file.file_format != file.file_format {
                findings.push(Finding::error(
                    "mismatched controlled_by",
                    format!(
                        "File {} with file_format {} has a controlled_by file {} with file_format {}",
                        value.id, file.file_format, control.id, control_file.file_format
                    ),
                ));
                return Ok(findings);
            }
            if !dataset.possible_controls.contains(&control_dataset.id) {
                findings.push(Finding::error(
                    "mismatched controlled_by",
                    format!(
                        "File {} has a controlled_by file {} with a dataset {} that is not in \
                         possible_controls",
                        value.id, control.id, control_dataset.id
                    ),
                ));
                return Ok(findings);
            }

            let (Some(run_type), Some(control_run)) =
                (file.run_type.as_deref(), control_file.run_type.as_deref())
            else {
                continue;
            };
            let (Some(read_length), Some(control_length)) =
                (file.read_length, control_file.read_length)
            else {
                continue;
            };
            if run_type != control_run {
                findings.push(Finding::not_compliant(
                    "mismatched controlled_by run_type",
                    format!(
                        "File {} is {run_type} but its control file {} is {control_run}",
                        value.id, control.id
                    ),
                ));
            }
            if read_length != control_length {
                findings.push(Finding::not_compliant(
                    "mismatched controlled_by read length",
                    format!(
                        "File {} is {read_length} but its control file {} is {control_length}",
                        value.id, control.id
                    ),
                ));
                return Ok(findings);
            }
        }
        Ok(findings)
    }
}

/// `file_format_specifications`: attached specs must be specification documents.
pub struct FormatSpecificationsCheck;

impl FormatSpecificationsCheck {
    pub const NAME: &'static str = "file_format_specifications";
}

impl AuditCheck for FormatSpecificationsCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let wrong = value.many(rel::FILE_FORMAT_SPECIFICATIONS).iter().find(|doc| {
            doc.as_document()
                .and_then(|d| d.document_type.as_deref())
                != Some(FORMAT_SPECIFICATION)
        });
        Ok(wrong
            .map(|doc| {
                Finding::error(
                    "wrong document_type",
                    format!(
                        "File {} has document {} not of type {FORMAT_SPECIFICATION}",
                        value.id, doc.id
                    ),
                )
            })
            .into_iter()
            .collect())
    }
}
