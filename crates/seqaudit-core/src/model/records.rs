//! Typed attribute records for each entity kind.
//!
//! Single-valued relations are `Option<EntityId>`. Multi-valued relations are
//! plain `Vec<EntityId>` that decode as empty when absent, except where the
//! difference between "absent" and "empty" is itself audited
//! (`software_versions`, `pipelines`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::EntityId;
use super::metric::MetricValue;

/// A data artifact: reads, alignments, peaks, quantifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecord {
    pub file_format: String,
    pub file_format_type: Option<String>,
    pub output_type: String,
    pub lab: Option<String>,
    pub platform: Option<EntityId>,
    pub read_length: Option<u32>,
    pub run_type: Option<String>,
    pub paired_end: Option<String>,
    pub file_size: Option<u64>,
    pub date_created: Option<String>,
    pub flowcell_details: Vec<FlowcellDetail>,

    pub dataset: Option<EntityId>,
    pub replicate: Option<EntityId>,
    pub derived_from: Vec<EntityId>,
    pub controlled_by: Vec<EntityId>,
    pub paired_with: Option<EntityId>,
    pub analysis_step_version: Option<EntityId>,
    pub quality_metrics: Vec<EntityId>,
    pub step_run: Option<EntityId>,
    pub file_format_specifications: Vec<EntityId>,
}

impl FileRecord {
    /// Calendar date of `date_created` (`YYYY-MM-DD...`).
    pub fn created_on(&self) -> Option<chrono::NaiveDate> {
        let raw = self.date_created.as_deref()?;
        chrono::NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// Sequencer run details attached to a fastq.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowcellDetail {
    pub machine: Option<String>,
    pub flowcell: Option<String>,
    pub lane: Option<String>,
    pub barcode: Option<String>,
}

/// Grouping of files and replicates for one experiment or annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetRecord {
    pub dataset_class: DatasetClass,
    pub assay_term_name: Option<String>,
    pub assay_term_id: Option<String>,
    pub biosample_term_id: Option<String>,
    pub replication_type: Option<String>,

    pub target: Option<EntityId>,
    pub possible_controls: Vec<EntityId>,
    pub original_files: Vec<EntityId>,
}

/// Collection family of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetClass {
    #[default]
    Experiment,
    Annotation,
    Reference,
    Project,
    PublicationData,
    UcscBrowserComposite,
    Series,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicateRecord {
    pub biological_replicate_number: u32,
    pub technical_replicate_number: u32,
    pub experiment: Option<EntityId>,
}

impl ReplicateRecord {
    /// `(biological, technical)` replicate identity.
    pub fn identity(&self) -> (u32, u32) {
        (self.biological_replicate_number, self.technical_replicate_number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStepVersionRecord {
    pub analysis_step: Option<EntityId>,
    pub software_versions: Option<Vec<EntityId>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStepRecord {
    pub title: Option<String>,
    pub pipelines: Option<Vec<EntityId>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRecord {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareVersionRecord {
    pub version: Option<String>,
    pub software: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareRecord {
    pub title: String,
}

/// Flat mapping of named measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetricRecord {
    #[serde(flatten)]
    pub values: BTreeMap<String, MetricValue>,
}

impl QualityMetricRecord {
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn with(mut self, name: &str, value: impl Into<MetricValue>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetRecord {
    pub name: Option<String>,
    pub label: Option<String>,
    pub investigated_as: Vec<String>,
}

/// Grant record; its `rfa` is the funding category gating rule applicability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardRecord {
    pub name: Option<String>,
    pub rfa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    pub document_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepRunRecord {
    pub aliases: Vec<String>,
}
