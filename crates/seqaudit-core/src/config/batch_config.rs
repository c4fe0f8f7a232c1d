//! Batch evaluation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for multi-entity evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads. Default: rayon's global pool.
    pub threads: Option<usize>,
    /// Evaluate entities in parallel. Default: true.
    pub parallel: Option<bool>,
}

impl BatchConfig {
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
