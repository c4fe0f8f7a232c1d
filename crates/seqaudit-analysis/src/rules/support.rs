//! Helpers shared by the file rules.

use seqaudit_core::errors::RuleError;
use seqaudit_core::model::relations as rel;
use seqaudit_core::model::FileRecord;

use crate::audit::Finding;
use crate::frame::ResolvedEntity;

pub const BAM: &str = "bam";
pub const FASTQ: &str = "fastq";
pub const TRANSCRIPTOME_ALIGNMENTS: &str = "transcriptome alignments";

/// The file body of a value dispatched to a file rule.
pub fn file_record<'a>(
    rule: &'static str,
    value: &'a ResolvedEntity,
) -> Result<&'a FileRecord, RuleError> {
    value.as_file().ok_or_else(|| RuleError::MalformedValue {
        rule,
        entity: value.id.to_string(),
        field: "@type".to_string(),
        message: format!("expected a file, found {}", value.kind()),
    })
}

/// An embedded relation the rule cannot proceed without.
pub fn require<'a>(
    rule: &'static str,
    value: &'a ResolvedEntity,
    relation: &str,
) -> Result<&'a ResolvedEntity, RuleError> {
    value
        .one(relation)
        .ok_or_else(|| RuleError::UnresolvedRelation {
            rule,
            entity: value.id.to_string(),
            relation: relation.to_string(),
        })
}

/// True for alignments produced by the uniform processing lab.
pub fn is_processed_alignment(file: &FileRecord, processing_lab: &str) -> bool {
    file.file_format == BAM
        && file.output_type != TRANSCRIPTOME_ALIGNMENTS
        && file.lab.as_deref() == Some(processing_lab)
}

/// Where a step chain first breaks, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainGap {
    MissingStepVersion,
    MissingStep,
    MissingPipelines,
    MissingSoftwareVersions,
    EmptySoftwareVersions,
}

impl ChainGap {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingStepVersion => "missing analysis step version",
            Self::MissingStep => "missing analysis step",
            Self::MissingPipelines => "missing pipelines in analysis step",
            Self::MissingSoftwareVersions => "missing software versions",
            Self::EmptySoftwareVersions => "missing software",
        }
    }

    /// The curation request for this gap; `noun` names the file role.
    pub fn finding(&self, value: &ResolvedEntity, noun: &str) -> Finding {
        let step_version = value.one(rel::ANALYSIS_STEP_VERSION);
        let version_id = step_version.map(|v| v.id.to_string()).unwrap_or_default();
        let step_id = step_version
            .and_then(|v| v.one(rel::ANALYSIS_STEP))
            .map(|s| s.id.to_string())
            .unwrap_or_default();
        let detail = match self {
            Self::MissingStepVersion => {
                format!("ENCODE Processed {noun} {} has no analysis step version", value.id)
            }
            Self::MissingStep => format!(
                "ENCODE Processed {noun} {} has no analysis step in {}",
                value.id,
                version_id
            ),
            Self::MissingPipelines => format!(
                "ENCODE Processed {noun} {} has no pipelines in {}",
                value.id,
                step_id
            ),
            Self::MissingSoftwareVersions => format!(
                "ENCODE Processed {noun} {} has no software_versions in {}",
                value.id,
                version_id
            ),
            Self::EmptySoftwareVersions => format!(
                "ENCODE Processed {noun} {} has no softwares listed in software_versions, under {}",
                value.id,
                version_id
            ),
        };
        Finding::dcc_action(self.code(), detail)
    }
}

/// A resolved `analysis_step_version -> analysis_step -> pipelines` chain.
#[derive(Debug, Clone, Copy)]
pub struct StepChain<'a> {
    pub step_version: &'a ResolvedEntity,
    pub step: &'a ResolvedEntity,
    pub pipelines: &'a [ResolvedEntity],
}

impl<'a> StepChain<'a> {
    /// Walk the chain, stopping at the first missing hop.
    pub fn resolve(file: &'a ResolvedEntity) -> Result<Self, ChainGap> {
        let step_version = file
            .one(rel::ANALYSIS_STEP_VERSION)
            .ok_or(ChainGap::MissingStepVersion)?;
        let step = step_version
            .one(rel::ANALYSIS_STEP)
            .ok_or(ChainGap::MissingStep)?;
        let declares_pipelines = step
            .as_analysis_step()
            .is_some_and(|s| s.pipelines.is_some());
        if !declares_pipelines {
            return Err(ChainGap::MissingPipelines);
        }
        Ok(Self {
            step_version,
            step,
            pipelines: step.many(rel::PIPELINES),
        })
    }

    /// The software versions of the step version; absent and empty lists are gaps.
    pub fn software_versions(&self) -> Result<&'a [ResolvedEntity], ChainGap> {
        let declared = self
            .step_version
            .as_analysis_step_version()
            .and_then(|v| v.software_versions.as_ref());
        match declared {
            None => Err(ChainGap::MissingSoftwareVersions),
            Some(ids) if ids.is_empty() => Err(ChainGap::EmptySoftwareVersions),
            Some(_) => Ok(self.step_version.many(rel::SOFTWARE_VERSIONS)),
        }
    }

    pub fn pipeline_titles(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.pipelines
            .iter()
            .filter_map(|p| p.as_pipeline().map(|p| p.title.as_str()))
    }

    pub fn has_pipeline(&self, title: &str) -> bool {
        self.pipeline_titles().any(|t| t == title)
    }
}

/// Titles of the software behind each software version.
pub fn software_titles(versions: &[ResolvedEntity]) -> impl Iterator<Item = &str> {
    versions.iter().filter_map(|v| {
        v.one(rel::SOFTWARE)
            .and_then(|s| s.as_software())
            .map(|s| s.title.as_str())
    })
}

/// Name of the target of the file's dataset.
pub fn target_name(file: &ResolvedEntity) -> Option<&str> {
    file.one(rel::DATASET)?
        .one(rel::TARGET)?
        .as_target()?
        .name
        .as_deref()
}
