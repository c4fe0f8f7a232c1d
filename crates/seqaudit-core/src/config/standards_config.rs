//! Standards threshold configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::standards::{DepthRequirement, Standards};

/// User-facing overrides for the standards tables. Unset fields fall back
/// to the compiled 2015 tables; table entries are merged per key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StandardsConfig {
    pub revision: Option<String>,
    pub processing_lab: Option<String>,
    pub tiered_pipeline: Option<String>,
    /// Per-pipeline depth overrides, merged over the defaults.
    pub read_depth: BTreeMap<String, DepthRequirement>,
    /// Per-assay depth overrides, merged over the defaults.
    pub special_assay_read_depth: BTreeMap<String, u64>,
    /// Replaces the broad-mark target list when non-empty.
    pub broad_mark_targets: Vec<String>,
    /// Replaces the control target list when non-empty.
    pub control_targets: Vec<String>,
    /// Universal depth floor. Default: 10,000,000.
    pub depth_floor: Option<u64>,
    pub unfiltered_pipelines: Vec<String>,
    pub excluded_software: Vec<String>,
    /// Enables the modERN signal step-run checks. Default: false.
    pub check_signal_step_runs: Option<bool>,
}

impl StandardsConfig {
    /// Resolve overrides against the compiled defaults.
    pub fn resolve(&self) -> Standards {
        let mut standards = Standards::default();
        if let Some(ref v) = self.revision {
            standards.revision = v.clone();
        }
        if let Some(ref v) = self.processing_lab {
            standards.processing_lab = v.clone();
        }
        if let Some(ref v) = self.tiered_pipeline {
            standards.tiered_pipeline = v.clone();
        }
        for (pipeline, requirement) in &self.read_depth {
            standards
                .pipelines_with_read_depth
                .insert(pipeline.clone(), *requirement);
        }
        for (assay, minimum) in &self.special_assay_read_depth {
            standards
                .special_assays_with_read_depth
                .insert(assay.clone(), *minimum);
        }
        if !self.broad_mark_targets.is_empty() {
            standards.broad_mark_targets = self.broad_mark_targets.clone();
        }
        if !self.control_targets.is_empty() {
            standards.control_targets = self.control_targets.clone();
        }
        if let Some(v) = self.depth_floor {
            standards.depth_floor = v;
        }
        if !self.unfiltered_pipelines.is_empty() {
            standards.unfiltered_pipelines = self.unfiltered_pipelines.clone();
        }
        if !self.excluded_software.is_empty() {
            standards.excluded_software = self.excluded_software.clone();
        }
        if let Some(v) = self.check_signal_step_runs {
            standards.check_signal_step_runs = v;
        }
        standards
    }

    /// Merge `other` into `self`; set values in `other` win.
    pub fn merge(&mut self, other: &StandardsConfig) {
        if other.revision.is_some() {
            self.revision = other.revision.clone();
        }
        if other.processing_lab.is_some() {
            self.processing_lab = other.processing_lab.clone();
        }
        if other.tiered_pipeline.is_some() {
            self.tiered_pipeline = other.tiered_pipeline.clone();
        }
        for (k, v) in &other.read_depth {
            self.read_depth.insert(k.clone(), *v);
        }
        for (k, v) in &other.special_assay_read_depth {
            self.special_assay_read_depth.insert(k.clone(), *v);
        }
        if !other.broad_mark_targets.is_empty() {
            self.broad_mark_targets = other.broad_mark_targets.clone();
        }
        if !other.control_targets.is_empty() {
            self.control_targets = other.control_targets.clone();
        }
        if other.depth_floor.is_some() {
            self.depth_floor = other.depth_floor;
        }
        if !other.unfiltered_pipelines.is_empty() {
            self.unfiltered_pipelines = other.unfiltered_pipelines.clone();
        }
        if !other.excluded_software.is_empty() {
            self.excluded_software = other.excluded_software.clone();
        }
        if other.check_signal_step_runs.is_some() {
            self.check_signal_step_runs = other.check_signal_step_runs;
        }
    }
}
