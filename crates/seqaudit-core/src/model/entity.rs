//! Entities and the relation capability.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::EntityId;
use super::records::*;
use super::relations as rel;
use super::status::Status;

/// The type of an entity, used to key rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    File,
    Dataset,
    Replicate,
    AnalysisStepVersion,
    AnalysisStep,
    Pipeline,
    SoftwareVersion,
    Software,
    QualityMetric,
    Target,
    Award,
    Document,
    StepRun,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dataset => "dataset",
            Self::Replicate => "replicate",
            Self::AnalysisStepVersion => "analysis_step_version",
            Self::AnalysisStep => "analysis_step",
            Self::Pipeline => "pipeline",
            Self::SoftwareVersion => "software_version",
            Self::Software => "software",
            Self::QualityMetric => "quality_metric",
            Self::Target => "target",
            Self::Award => "award",
            Self::Document => "document",
            Self::StepRun => "step_run",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-specific attributes, tagged by `@type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "snake_case")]
pub enum EntityBody {
    File(FileRecord),
    Dataset(DatasetRecord),
    Replicate(ReplicateRecord),
    AnalysisStepVersion(AnalysisStepVersionRecord),
    AnalysisStep(AnalysisStepRecord),
    Pipeline(PipelineRecord),
    SoftwareVersion(SoftwareVersionRecord),
    Software(SoftwareRecord),
    QualityMetric(QualityMetricRecord),
    Target(TargetRecord),
    Award(AwardRecord),
    Document(DocumentRecord),
    StepRun(StepRunRecord),
}

/// A linked reference read off an entity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link<'a> {
    One(&'a EntityId),
    Many(&'a [EntityId]),
}

impl<'a> Link<'a> {
    pub fn ids(&self) -> &'a [EntityId] {
        match *self {
            Link::One(id) => std::slice::from_ref(id),
            Link::Many(ids) => ids,
        }
    }
}

/// An immutable snapshot of one record in the provenance graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "@id")]
    pub id: EntityId,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub accession: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub award: Option<EntityId>,
    #[serde(flatten)]
    pub body: EntityBody,
}

macro_rules! body_accessor {
    ($fn_name:ident, $variant:ident, $record:ty) => {
        pub fn $fn_name(&self) -> Option<&$record> {
            match &self.body {
                EntityBody::$variant(record) => Some(record),
                _ => None,
            }
        }
    };
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, body: EntityBody) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            accession: None,
            status: Status::default(),
            award: None,
            body,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_accession(mut self, accession: impl Into<String>) -> Self {
        self.accession = Some(accession.into());
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_award(mut self, award: impl Into<EntityId>) -> Self {
        self.award = Some(award.into());
        self
    }

    pub fn kind(&self) -> EntityKind {
        match &self.body {
            EntityBody::File(_) => EntityKind::File,
            EntityBody::Dataset(_) => EntityKind::Dataset,
            EntityBody::Replicate(_) => EntityKind::Replicate,
            EntityBody::AnalysisStepVersion(_) => EntityKind::AnalysisStepVersion,
            EntityBody::AnalysisStep(_) => EntityKind::AnalysisStep,
            EntityBody::Pipeline(_) => EntityKind::Pipeline,
            EntityBody::SoftwareVersion(_) => EntityKind::SoftwareVersion,
            EntityBody::Software(_) => EntityKind::Software,
            EntityBody::QualityMetric(_) => EntityKind::QualityMetric,
            EntityBody::Target(_) => EntityKind::Target,
            EntityBody::Award(_) => EntityKind::Award,
            EntityBody::Document(_) => EntityKind::Document,
            EntityBody::StepRun(_) => EntityKind::StepRun,
        }
    }

    body_accessor!(as_file, File, FileRecord);
    body_accessor!(as_dataset, Dataset, DatasetRecord);
    body_accessor!(as_replicate, Replicate, ReplicateRecord);
    body_accessor!(as_analysis_step_version, AnalysisStepVersion, AnalysisStepVersionRecord);
    body_accessor!(as_analysis_step, AnalysisStep, AnalysisStepRecord);
    body_accessor!(as_pipeline, Pipeline, PipelineRecord);
    body_accessor!(as_software_version, SoftwareVersion, SoftwareVersionRecord);
    body_accessor!(as_software, Software, SoftwareRecord);
    body_accessor!(as_quality_metric, QualityMetric, QualityMetricRecord);
    body_accessor!(as_target, Target, TargetRecord);
    body_accessor!(as_award, Award, AwardRecord);
    body_accessor!(as_document, Document, DocumentRecord);
    body_accessor!(as_step_run, StepRun, StepRunRecord);

    /// Relation names this entity's kind can carry.
    pub fn relation_names(&self) -> &'static [&'static str] {
        match &self.body {
            EntityBody::File(_) => &[
                rel::AWARD,
                rel::DATASET,
                rel::REPLICATE,
                rel::DERIVED_FROM,
                rel::CONTROLLED_BY,
                rel::PAIRED_WITH,
                rel::ANALYSIS_STEP_VERSION,
                rel::QUALITY_METRICS,
                rel::STEP_RUN,
                rel::FILE_FORMAT_SPECIFICATIONS,
            ],
            EntityBody::Dataset(_) => &[
                rel::AWARD,
                rel::TARGET,
                rel::POSSIBLE_CONTROLS,
                rel::ORIGINAL_FILES,
            ],
            EntityBody::Replicate(_) => &[rel::AWARD, rel::EXPERIMENT],
            EntityBody::AnalysisStepVersion(_) => {
                &[rel::AWARD, rel::ANALYSIS_STEP, rel::SOFTWARE_VERSIONS]
            }
            EntityBody::AnalysisStep(_) => &[rel::AWARD, rel::PIPELINES],
            EntityBody::SoftwareVersion(_) => &[rel::AWARD, rel::SOFTWARE],
            _ => &[rel::AWARD],
        }
    }

    /// Look up a declared relation by name. `None` means the relation is
    /// absent on this record (or unknown for its kind).
    pub fn relation(&self, name: &str) -> Option<Link<'_>> {
        if name == rel::AWARD {
            return self.award.as_ref().map(Link::One);
        }
        match (&self.body, name) {
            (EntityBody::File(f), rel::DATASET) => f.dataset.as_ref().map(Link::One),
            (EntityBody::File(f), rel::REPLICATE) => f.replicate.as_ref().map(Link::One),
            (EntityBody::File(f), rel::DERIVED_FROM) => Some(Link::Many(&f.derived_from)),
            (EntityBody::File(f), rel::CONTROLLED_BY) => Some(Link::Many(&f.controlled_by)),
            (EntityBody::File(f), rel::PAIRED_WITH) => f.paired_with.as_ref().map(Link::One),
            (EntityBody::File(f), rel::ANALYSIS_STEP_VERSION) => {
                f.analysis_step_version.as_ref().map(Link::One)
            }
            (EntityBody::File(f), rel::QUALITY_METRICS) => Some(Link::Many(&f.quality_metrics)),
            (EntityBody::File(f), rel::STEP_RUN) => f.step_run.as_ref().map(Link::One),
            (EntityBody::File(f), rel::FILE_FORMAT_SPECIFICATIONS) => {
                Some(Link::Many(&f.file_format_specifications))
            }
            (EntityBody::Dataset(d), rel::TARGET) => d.target.as_ref().map(Link::One),
            (EntityBody::Dataset(d), rel::POSSIBLE_CONTROLS) => {
                Some(Link::Many(&d.possible_controls))
            }
            (EntityBody::Dataset(d), rel::ORIGINAL_FILES) => Some(Link::Many(&d.original_files)),
            (EntityBody::Replicate(r), rel::EXPERIMENT) => r.experiment.as_ref().map(Link::One),
            (EntityBody::AnalysisStepVersion(v), rel::ANALYSIS_STEP) => {
                v.analysis_step.as_ref().map(Link::One)
            }
            (EntityBody::AnalysisStepVersion(v), rel::SOFTWARE_VERSIONS) => {
                v.software_versions.as_deref().map(Link::Many)
            }
            (EntityBody::AnalysisStep(s), rel::PIPELINES) => s.pipelines.as_deref().map(Link::Many),
            (EntityBody::SoftwareVersion(v), rel::SOFTWARE) => v.software.as_ref().map(Link::One),
            _ => None,
        }
    }

    pub fn has_relation(&self, name: &str) -> bool {
        self.relation(name).is_some()
    }

    /// All present relations, in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = (&'static str, Link<'_>)> + '_ {
        self.relation_names()
            .iter()
            .filter_map(move |name| self.relation(name).map(|link| (*name, link)))
    }

    /// Short display name: the accession when known, otherwise the `@id`.
    pub fn label(&self) -> &str {
        self.accession.as_deref().unwrap_or(self.id.as_str())
    }
}
