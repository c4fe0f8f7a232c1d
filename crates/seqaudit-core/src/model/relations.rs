//! Relation names understood by the graph and the frame resolver.

pub const AWARD: &str = "award";
pub const DATASET: &str = "dataset";
pub const REPLICATE: &str = "replicate";
pub const DERIVED_FROM: &str = "derived_from";
pub const CONTROLLED_BY: &str = "controlled_by";
pub const PAIRED_WITH: &str = "paired_with";
pub const ANALYSIS_STEP_VERSION: &str = "analysis_step_version";
pub const QUALITY_METRICS: &str = "quality_metrics";
pub const STEP_RUN: &str = "step_run";
pub const FILE_FORMAT_SPECIFICATIONS: &str = "file_format_specifications";
pub const TARGET: &str = "target";
pub const POSSIBLE_CONTROLS: &str = "possible_controls";
pub const ORIGINAL_FILES: &str = "original_files";
pub const EXPERIMENT: &str = "experiment";
pub const ANALYSIS_STEP: &str = "analysis_step";
pub const SOFTWARE_VERSIONS: &str = "software_versions";
pub const PIPELINES: &str = "pipelines";
pub const SOFTWARE: &str = "software";
