//! Top-level seqaudit configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BatchConfig, RuleConfig, StandardsConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "seqaudit.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SEQAUDIT_*`)
/// 3. Project config (`seqaudit.toml` in project root)
/// 4. User config (`~/.seqaudit/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    pub standards: StandardsConfig,
    pub rules: RuleConfig,
    pub batch: BatchConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub processing_lab: Option<String>,
    pub depth_floor: Option<u64>,
    pub threads: Option<usize>,
    pub disabled_rules: Vec<String>,
}

impl AuditConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(path = %user_config_path.display(), error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values against the resolved tables.
    pub fn validate(config: &AuditConfig) -> Result<(), ConfigError> {
        let standards = config.standards.resolve();
        if standards.processing_lab.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "standards.processing_lab".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if standards.depth_floor == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "standards.depth_floor".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if !standards.has_depth_requirement(&standards.tiered_pipeline) {
            return Err(ConfigError::ValidationFailed {
                field: "standards.tiered_pipeline".to_string(),
                message: format!("{:?} has no read_depth entry", standards.tiered_pipeline),
            });
        }
        for (pipeline, requirement) in &standards.pipelines_with_read_depth {
            if let super::DepthRequirement::Tiered { narrow, broad } = requirement {
                if narrow > broad {
                    return Err(ConfigError::ValidationFailed {
                        field: format!("standards.read_depth.\"{pipeline}\""),
                        message: format!("narrow ({narrow}) must not exceed broad ({broad})"),
                    });
                }
            }
        }
        if let Some(0) = config.batch.threads {
            return Err(ConfigError::ValidationFailed {
                field: "batch.threads".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".seqaudit").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut AuditConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: AuditConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; values set in `other` win.
    fn merge(base: &mut AuditConfig, other: &AuditConfig) {
        base.standards.merge(&other.standards);

        if !other.rules.disabled.is_empty() {
            base.rules.disabled = other.rules.disabled.clone();
        }
        for (rule, categories) in &other.rules.funding_categories {
            base.rules
                .funding_categories
                .insert(rule.clone(), categories.clone());
        }

        if other.batch.threads.is_some() {
            base.batch.threads = other.batch.threads;
        }
        if other.batch.parallel.is_some() {
            base.batch.parallel = other.batch.parallel;
        }
    }

    /// Pattern: `SEQAUDIT_PROCESSING_LAB`, `SEQAUDIT_DEPTH_FLOOR`, etc.
    fn apply_env_overrides(config: &mut AuditConfig) {
        if let Ok(val) = std::env::var("SEQAUDIT_PROCESSING_LAB") {
            config.standards.processing_lab = Some(val);
        }
        if let Ok(val) = std::env::var("SEQAUDIT_DEPTH_FLOOR") {
            if let Ok(v) = val.parse::<u64>() {
                config.standards.depth_floor = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEQAUDIT_SIGNAL_STEP_RUNS") {
            if let Ok(v) = val.parse::<bool>() {
                config.standards.check_signal_step_runs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEQAUDIT_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.batch.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEQAUDIT_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.batch.parallel = Some(v);
            }
        }
    }

    fn apply_cli_overrides(config: &mut AuditConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.processing_lab {
            config.standards.processing_lab = Some(v.clone());
        }
        if let Some(v) = cli.depth_floor {
            config.standards.depth_floor = Some(v);
        }
        if let Some(v) = cli.threads {
            config.batch.threads = Some(v);
        }
        for rule in &cli.disabled_rules {
            if !config.rules.is_disabled(rule) {
                config.rules.disabled.push(rule.clone());
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
