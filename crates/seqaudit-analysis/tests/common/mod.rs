//! Fixture builders shared by the seqaudit-analysis integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use seqaudit_analysis::frame::{Frame, FrameResolver, ResolvedEntity};
use seqaudit_core::config::standards::DEFAULT_PROCESSING_LAB;
use seqaudit_core::graph::{InMemoryGraph, ProvenanceGraph};
use seqaudit_core::model::{
    AnalysisStepRecord, AnalysisStepVersionRecord, AwardRecord, DatasetRecord, Entity, EntityBody,
    EntityId, FileRecord, PipelineRecord, QualityMetricRecord, SoftwareRecord,
    SoftwareVersionRecord, Status, TargetRecord,
};

pub const ENCODE3_AWARD: &str = "/awards/U41HG006992/";
pub const GGR_AWARD: &str = "/awards/U01HG007900/";

pub const EXPERIMENT_BAM: &str = "/files/ENCFF100EBM/";
pub const EXPERIMENT_FASTQ: &str = "/files/ENCFF100EFQ/";
pub const CONTROL_BAM: &str = "/files/ENCFF200CBM/";
pub const CONTROL_FASTQ: &str = "/files/ENCFF200CFQ/";
pub const EXPERIMENT_QM: &str = "/quality-metrics/experiment-qm/";
pub const CONTROL_QM: &str = "/quality-metrics/control-qm/";
pub const STEP_VERSION: &str = "/analysis-step-versions/histone-align-v1/";

/// Accumulates entities into an in-memory graph.
#[derive(Default)]
pub struct GraphBuilder {
    graph: InMemoryGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) -> &mut Self {
        self.graph.insert(entity).unwrap();
        self
    }

    pub fn build(self) -> InMemoryGraph {
        self.graph
    }
}

pub fn award(id: &str, rfa: &str) -> Entity {
    Entity::new(
        id,
        EntityBody::Award(AwardRecord {
            name: None,
            rfa: Some(rfa.to_string()),
        }),
    )
}

pub fn file(id: &str, record: FileRecord) -> Entity {
    Entity::new(id, EntityBody::File(record))
}

pub fn fastq() -> FileRecord {
    FileRecord {
        file_format: "fastq".to_string(),
        output_type: "reads".to_string(),
        ..Default::default()
    }
}

pub fn processed_bam() -> FileRecord {
    FileRecord {
        file_format: "bam".to_string(),
        output_type: "alignments".to_string(),
        lab: Some(DEFAULT_PROCESSING_LAB.to_string()),
        ..Default::default()
    }
}

pub fn ids(values: &[&str]) -> Vec<EntityId> {
    values.iter().map(|v| EntityId::from(*v)).collect()
}

pub fn target(name: &str) -> Entity {
    Entity::new(
        format!("/targets/{name}/"),
        EntityBody::Target(TargetRecord {
            name: Some(name.to_string()),
            label: None,
            investigated_as: Vec::new(),
        }),
    )
}

pub fn quality_metric(id: &str, values: &[(&str, serde_json::Value)]) -> Entity {
    let json = serde_json::Value::Object(
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    );
    let record: QualityMetricRecord = serde_json::from_value(json).unwrap();
    Entity::new(id, EntityBody::QualityMetric(record))
}

/// Adds the pipeline, step, step version and software for one pipeline title.
pub fn add_step_chain(builder: &mut GraphBuilder, step_version: &str, pipeline: &str, software: &str) {
    let suffix = step_version.trim_matches('/').replace('/', "-");
    let pipeline_id = format!("/pipelines/{suffix}/");
    let step_id = format!("/analysis-steps/{suffix}/");
    let software_id = format!("/software/{suffix}/");
    let software_version_id = format!("/software-versions/{suffix}/");
    builder
        .add(Entity::new(
            pipeline_id.as_str(),
            EntityBody::Pipeline(PipelineRecord {
                title: pipeline.to_string(),
            }),
        ))
        .add(Entity::new(
            step_id.as_str(),
            EntityBody::AnalysisStep(AnalysisStepRecord {
                title: Some("alignment".to_string()),
                pipelines: Some(vec![EntityId::from(pipeline_id)]),
            }),
        ))
        .add(Entity::new(
            software_id.as_str(),
            EntityBody::Software(SoftwareRecord {
                title: software.to_string(),
            }),
        ))
        .add(Entity::new(
            software_version_id.as_str(),
            EntityBody::SoftwareVersion(SoftwareVersionRecord {
                version: Some("1.0".to_string()),
                software: Some(EntityId::from(software_id)),
            }),
        ))
        .add(Entity::new(
            step_version,
            EntityBody::AnalysisStepVersion(AnalysisStepVersionRecord {
                analysis_step: Some(EntityId::from(step_id)),
                software_versions: Some(vec![EntityId::from(software_version_id)]),
            }),
        ));
}

/// A histone ChIP-seq experiment alignment and its control alignment, both
/// derived from fastqs linked by `controlled_by`.
#[derive(Debug, Clone)]
pub struct ChipScenario {
    pub target: Option<&'static str>,
    pub experiment_total: i64,
    pub control_total: i64,
    pub paired_end_metrics: bool,
    pub software: &'static str,
    /// Revoked control bams listed before the live one.
    pub retired_decoys: usize,
}

impl Default for ChipScenario {
    fn default() -> Self {
        Self {
            target: Some("H3K27me3-human"),
            experiment_total: 50_000_000,
            control_total: 50_000_000,
            paired_end_metrics: false,
            software: "BWA",
            retired_decoys: 0,
        }
    }
}

impl ChipScenario {
    pub fn build(&self) -> InMemoryGraph {
        let mut builder = GraphBuilder::new();
        builder.add(award(ENCODE3_AWARD, "ENCODE3"));
        add_step_chain(&mut builder, STEP_VERSION, "Histone ChIP-seq", self.software);
        builder.add(target("Control-human"));

        let experiment_dataset = "/experiments/ENCSR100EXP/";
        let control_dataset = "/experiments/ENCSR200CTL/";
        let experiment_target = self.target.map(|name| {
            if name != "Control-human" {
                builder.add(target(name));
            }
            EntityId::from(format!("/targets/{name}/"))
        });

        let decoys: Vec<String> = (0..self.retired_decoys)
            .map(|i| format!("/files/ENCFF9{i:02}DEC/"))
            .collect();
        let mut control_files: Vec<EntityId> = decoys.iter().map(|d| EntityId::from(d.as_str())).collect();
        control_files.extend(ids(&[CONTROL_FASTQ, CONTROL_BAM]));

        builder
            .add(Entity::new(
                experiment_dataset,
                EntityBody::Dataset(DatasetRecord {
                    assay_term_name: Some("ChIP-seq".to_string()),
                    target: experiment_target,
                    original_files: ids(&[EXPERIMENT_FASTQ, EXPERIMENT_BAM]),
                    ..Default::default()
                }),
            ))
            .add(Entity::new(
                control_dataset,
                EntityBody::Dataset(DatasetRecord {
                    assay_term_name: Some("ChIP-seq".to_string()),
                    target: Some(EntityId::from("/targets/Control-human/")),
                    original_files: control_files,
                    ..Default::default()
                }),
            ));

        builder
            .add(
                file(
                    CONTROL_FASTQ,
                    FileRecord {
                        dataset: Some(control_dataset.into()),
                        run_type: Some("single-ended".to_string()),
                        ..fastq()
                    },
                )
                .with_accession("ENCFF200CFQ")
                .with_award(ENCODE3_AWARD),
            )
            .add(
                file(
                    EXPERIMENT_FASTQ,
                    FileRecord {
                        dataset: Some(experiment_dataset.into()),
                        run_type: Some("single-ended".to_string()),
                        controlled_by: ids(&[CONTROL_FASTQ]),
                        ..fastq()
                    },
                )
                .with_accession("ENCFF100EFQ")
                .with_award(ENCODE3_AWARD),
            );

        let metric = |total: i64| {
            let mut values = vec![("total", serde_json::json!(total))];
            if self.paired_end_metrics {
                values.push(("read1", serde_json::json!(total / 2)));
                values.push(("read2", serde_json::json!(total / 2)));
            }
            values
        };
        builder
            .add(quality_metric(EXPERIMENT_QM, &metric(self.experiment_total)))
            .add(quality_metric(CONTROL_QM, &metric(self.control_total)));

        let alignment = |dataset: &str, fastq: &str, qm: &str| FileRecord {
            dataset: Some(dataset.into()),
            derived_from: ids(&[fastq]),
            analysis_step_version: Some(STEP_VERSION.into()),
            quality_metrics: ids(&[qm]),
            ..processed_bam()
        };
        for decoy in &decoys {
            builder.add(
                file(decoy, alignment(control_dataset, CONTROL_FASTQ, CONTROL_QM))
                    .with_status(Status::Revoked)
                    .with_award(ENCODE3_AWARD),
            );
        }
        builder
            .add(
                file(CONTROL_BAM, alignment(control_dataset, CONTROL_FASTQ, CONTROL_QM))
                    .with_accession("ENCFF200CBM")
                    .with_status(Status::Released)
                    .with_award(ENCODE3_AWARD),
            )
            .add(
                file(EXPERIMENT_BAM, alignment(experiment_dataset, EXPERIMENT_FASTQ, EXPERIMENT_QM))
                    .with_accession("ENCFF100EBM")
                    .with_status(Status::Released)
                    .with_award(ENCODE3_AWARD),
            );
        builder.build()
    }
}

/// Resolve `id` in `graph` against `frame`.
pub fn resolve(graph: &dyn ProvenanceGraph, id: &str, frame: &Frame) -> ResolvedEntity {
    let entity: Arc<Entity> = graph.get(&EntityId::from(id)).unwrap();
    FrameResolver::new(graph).resolve(entity, frame)
}
