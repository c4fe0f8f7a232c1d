//! Sequencing attributes of raw data files.

use chrono::NaiveDate;

use seqaudit_core::errors::RuleError;
use seqaudit_core::model::relations as rel;
use seqaudit_core::model::Status;

use crate::audit::{AuditCheck, AuditContext, CheckResult, Finding};
use crate::frame::ResolvedEntity;
use crate::rules::support::{file_record, FASTQ};

pub const RAW_DATA_FORMATS: &[&str] = &["fastq", "csfasta", "csqual", "rcc", "idat", "CEL"];
const READS: &str = "reads";
const PAIRED_ENDED: &str = "paired-ended";
const MIN_READ_LENGTH: u32 = 50;

/// Files created before this date are held to the older read-length standard.
fn read_length_cutoff() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2015, 6, 30)
}

/// `file_platform`: raw data files must name their sequencing platform.
pub struct PlatformCheck;

impl PlatformCheck {
    pub const NAME: &'static str = "file_platform";
}

impl AuditCheck for PlatformCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        if !RAW_DATA_FORMATS.contains(&file.file_format.as_str()) || file.platform.is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::not_compliant(
            "missing platform",
            format!("Raw data file {} missing platform information", value.id),
        )])
    }
}

/// `file_read_length`: reads need a read length of at least 50bp.
pub struct ReadLengthCheck;

impl ReadLengthCheck {
    pub const NAME: &'static str = "file_read_length";
}

impl AuditCheck for ReadLengthCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        if file.output_type != READS {
            return Ok(Vec::new());
        }
        let Some(read_length) = file.read_length else {
            return Ok(vec![Finding::dcc_action(
                "missing read_length",
                format!("Reads file {} missing read_length", value.id),
            )]);
        };
        let assay = value
            .one(rel::DATASET)
            .and_then(|d| d.as_dataset())
            .and_then(|d| d.assay_term_name.as_deref());
        if assay == Some("RNA Bind-n-Seq") || read_length >= MIN_READ_LENGTH {
            return Ok(Vec::new());
        }

        let created = match (&file.date_created, file.created_on()) {
            (None, _) => None,
            (Some(_), Some(date)) => Some(date),
            (Some(raw), None) => {
                return Err(RuleError::MalformedValue {
                    rule: Self::NAME,
                    entity: value.id.to_string(),
                    field: "date_created".to_string(),
                    message: format!("unparsable date {raw:?}"),
                })
            }
        };
        let created_label = created
            .map(|d| d.to_string())
            .unwrap_or_else(|| "an unknown date".to_string());
        let detail = format!(
            "Fastq file {} that was created on {created_label} has read length of \
             {read_length}bp. It is not compliant with ENCODE3 standards. According to ENCODE3 \
             standards files submitted after 2015-6-30 should be at least {MIN_READ_LENGTH}bp long.",
            value.id
        );
        let legacy = match (created, read_length_cutoff()) {
            (Some(date), Some(cutoff)) => date < cutoff,
            _ => false,
        };
        if legacy {
            Ok(vec![Finding::warning("insufficient read length", detail)])
        } else {
            Ok(vec![Finding::not_compliant("insufficient read length", detail)])
        }
    }
}

/// `file_flowcells`: fastq files should carry flowcell details.
pub struct FlowcellsCheck;

impl FlowcellsCheck {
    pub const NAME: &'static str = "file_flowcells";
}

impl AuditCheck for FlowcellsCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        if file.file_format != FASTQ || !file.flowcell_details.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::warning(
            "missing flowcell_details",
            format!("Fastq file {} is missing flowcell_details", value.id),
        )])
    }
}

/// `file_run_type`: fastq files must declare their run type.
pub struct RunTypeCheck;

impl RunTypeCheck {
    pub const NAME: &'static str = "file_run_type";
}

impl AuditCheck for RunTypeCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        if file.file_format != FASTQ || file.run_type.is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::not_compliant(
            "missing run_type",
            format!(
                "File {} has file_format {}. It requires a value for run_type",
                value.id, file.file_format
            ),
        )])
    }
}

/// `file_size`: every uploaded file needs a size.
pub struct FileSizeCheck;

impl FileSizeCheck {
    pub const NAME: &'static str = "file_size";
    const SKIPPED: &'static [Status] = &[
        Status::Deleted,
        Status::Replaced,
        Status::Revoked,
        Status::Uploading,
    ];
}

impl AuditCheck for FileSizeCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn skipped_statuses(&self) -> &'static [Status] {
        Self::SKIPPED
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        if file.file_size.is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::dcc_action(
            "missing file_size",
            format!("File {} requires a value for file_size", value.id),
        )])
    }
}

/// `file_paired_ended_run_type`: paired-ended reads need a read number and,
/// for the first read, a mate.
pub struct PairedEndedRunTypeCheck;

impl PairedEndedRunTypeCheck {
    pub const NAME: &'static str = "file_paired_ended_run_type";
    const SKIPPED: &'static [Status] = &[
        Status::Deleted,
        Status::Replaced,
        Status::Revoked,
        Status::UploadFailed,
    ];
    const FORMATS: &'static [&'static str] = &["fastq", "fasta", "csfasta"];
}

impl AuditCheck for PairedEndedRunTypeCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn skipped_statuses(&self) -> &'static [Status] {
        Self::SKIPPED
    }

    fn check(&self, value: &ResolvedEntity, _ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        if !Self::FORMATS.contains(&file.file_format.as_str())
            || file.output_type != READS
            || file.run_type.as_deref() != Some(PAIRED_ENDED)
        {
            return Ok(Vec::new());
        }
        match file.paired_end.as_deref() {
            None => Ok(vec![Finding::error(
                "missing paired_end",
                format!(
                    "File {} has a paired-ended run_type but is missing its paired_end value",
                    value.id
                ),
            )]),
            Some("1") if file.paired_with.is_none() => Ok(vec![Finding::dcc_action(
                "missing mate pair",
                format!(
                    "File {} has a paired-ended run_type but is missing a paired_end=2 mate",
                    value.id
                ),
            )]),
            Some(_) => Ok(Vec::new()),
        }
    }
}
