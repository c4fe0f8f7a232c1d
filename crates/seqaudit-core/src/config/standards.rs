//! Resolved standards tables consumed by the compliance rules.
//!
//! Built once from [`super::StandardsConfig`] at startup and shared
//! read-only by every rule invocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Minimum read depth required by a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepthRequirement {
    /// A single minimum for every replicate.
    Flat(u64),
    /// Separate minimums for narrow-mark and broad-mark targets.
    Tiered { narrow: u64, broad: u64 },
}

/// Versioned standards thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standards {
    /// Human-readable revision label quoted in finding details.
    pub revision: String,
    /// Lab identifier of the uniform processing pipeline.
    pub processing_lab: String,
    /// Pipeline whose depth uses the `total` metric and tiered thresholds.
    pub tiered_pipeline: String,
    pub pipelines_with_read_depth: BTreeMap<String, DepthRequirement>,
    pub special_assays_with_read_depth: BTreeMap<String, u64>,
    pub broad_mark_targets: Vec<String>,
    pub control_targets: Vec<String>,
    /// Universal minimum below which any ChIP-seq depth is not compliant.
    pub depth_floor: u64,
    /// Pipelines whose alignments carry no quality metrics by construction.
    pub unfiltered_pipelines: Vec<String>,
    /// Software whose alignments are exempt from depth standards.
    pub excluded_software: Vec<String>,
    /// Enables the modERN signal/bigBed step-run alias checks.
    pub check_signal_step_runs: bool,
}

pub const DEFAULT_PROCESSING_LAB: &str = "/labs/encode-processing-pipeline/";
pub const HISTONE_CHIP_SEQ: &str = "Histone ChIP-seq";
pub const DEFAULT_DEPTH_FLOOR: u64 = 10_000_000;

impl Default for Standards {
    fn default() -> Self {
        let pipelines_with_read_depth = BTreeMap::from([
            (
                "RNA-seq of long RNAs (paired-end, stranded)".to_string(),
                DepthRequirement::Flat(30_000_000),
            ),
            (
                "RNA-seq of long RNAs (single-end, unstranded)".to_string(),
                DepthRequirement::Flat(30_000_000),
            ),
            (
                "Small RNA-seq single-end pipeline".to_string(),
                DepthRequirement::Flat(30_000_000),
            ),
            (
                "RAMPAGE (paired-end, stranded)".to_string(),
                DepthRequirement::Flat(25_000_000),
            ),
            (
                HISTONE_CHIP_SEQ.to_string(),
                DepthRequirement::Tiered {
                    narrow: 20_000_000,
                    broad: 45_000_000,
                },
            ),
        ]);
        let special_assays_with_read_depth = BTreeMap::from([
            ("shRNA knockdown followed by RNA-seq".to_string(), 10_000_000),
            ("single cell isolation followed by RNA-seq".to_string(), 5_000_000),
        ]);
        let broad_mark_targets = [
            "H3K4me1", "H3K36me3", "H3K79me2", "H3K27me3", "H3K9me1", "H3K9me2", "H4K20me1",
        ]
        .iter()
        .flat_map(|mark| [format!("{mark}-human"), format!("{mark}-mouse")])
        .collect();

        Self {
            revision: "June 2015".to_string(),
            processing_lab: DEFAULT_PROCESSING_LAB.to_string(),
            tiered_pipeline: HISTONE_CHIP_SEQ.to_string(),
            pipelines_with_read_depth,
            special_assays_with_read_depth,
            broad_mark_targets,
            control_targets: vec!["Control-human".to_string(), "Control-mouse".to_string()],
            depth_floor: DEFAULT_DEPTH_FLOOR,
            unfiltered_pipelines: vec![
                "Raw mapping with no filtration".to_string(),
                "WGBS single-end pipeline - version 2".to_string(),
                "WGBS single-end pipeline".to_string(),
            ],
            excluded_software: vec!["TopHat".to_string()],
            check_signal_step_runs: false,
        }
    }
}

impl Standards {
    pub fn requirement(&self, pipeline_title: &str) -> Option<DepthRequirement> {
        self.pipelines_with_read_depth.get(pipeline_title).copied()
    }

    pub fn has_depth_requirement(&self, pipeline_title: &str) -> bool {
        self.pipelines_with_read_depth.contains_key(pipeline_title)
    }

    pub fn is_tiered_pipeline(&self, pipeline_title: &str) -> bool {
        self.tiered_pipeline == pipeline_title
    }

    /// `(narrow, broad)` thresholds of the tiered pipeline.
    pub fn tiers(&self) -> Option<(u64, u64)> {
        match self.requirement(&self.tiered_pipeline)? {
            DepthRequirement::Tiered { narrow, broad } => Some((narrow, broad)),
            DepthRequirement::Flat(min) => Some((min, min)),
        }
    }

    pub fn special_assay_minimum(&self, assay: &str) -> Option<u64> {
        self.special_assays_with_read_depth.get(assay).copied()
    }

    pub fn is_broad_mark(&self, target: &str) -> bool {
        self.broad_mark_targets.iter().any(|t| t == target)
    }

    pub fn is_control_target(&self, target: &str) -> bool {
        self.control_targets.iter().any(|t| t == target)
    }

    pub fn is_unfiltered_pipeline(&self, title: &str) -> bool {
        self.unfiltered_pipelines.iter().any(|t| t == title)
    }

    pub fn is_excluded_software(&self, title: &str) -> bool {
        self.excluded_software.iter().any(|t| t == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_tiered_for_histone() {
        let standards = Standards::default();
        assert_eq!(standards.tiers(), Some((20_000_000, 45_000_000)));
        assert!(standards.is_broad_mark("H3K27me3-human"));
        assert!(!standards.is_broad_mark("H3K4me3-human"));
        assert!(standards.is_control_target("Control-mouse"));
    }

    #[test]
    fn depth_requirement_decodes_both_shapes() {
        let flat: DepthRequirement = serde_json::from_str("30000000").unwrap();
        assert_eq!(flat, DepthRequirement::Flat(30_000_000));
        let tiered: DepthRequirement =
            serde_json::from_str(r#"{"narrow": 10000000, "broad": 20000000}"#).unwrap();
        assert_eq!(
            tiered,
            DepthRequirement::Tiered {
                narrow: 10_000_000,
                broad: 20_000_000
            }
        );
    }
}
