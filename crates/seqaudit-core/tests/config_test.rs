//! Tests for the seqaudit configuration system.

use std::sync::Mutex;

use seqaudit_core::config::{AuditConfig, CliOverrides, DepthRequirement};
use seqaudit_core::errors::{AuditErrorCode, ConfigError};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper: create a temporary directory.
fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all SEQAUDIT_ env vars and point HOME at an empty directory so the
/// user config layer cannot leak into the test.
fn isolate_env(home: &std::path::Path) {
    for key in [
        "SEQAUDIT_PROCESSING_LAB",
        "SEQAUDIT_DEPTH_FLOOR",
        "SEQAUDIT_SIGNAL_STEP_RUNS",
        "SEQAUDIT_THREADS",
        "SEQAUDIT_PARALLEL",
    ] {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", home);
}

/// Layer order: CLI > env > project > user > defaults.
#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let user_dir = home.path().join(".seqaudit");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        r#"
[standards]
revision = "user revision"
depth_floor = 1_000_000
"#,
    )
    .unwrap();

    let project = tempdir();
    std::fs::write(
        project.path().join("seqaudit.toml"),
        r#"
[standards]
depth_floor = 2_000_000
processing_lab = "/labs/project-lab/"

[batch]
threads = 2
"#,
    )
    .unwrap();

    std::env::set_var("SEQAUDIT_PROCESSING_LAB", "/labs/env-lab/");
    std::env::set_var("SEQAUDIT_THREADS", "3");

    let cli = CliOverrides {
        threads: Some(8),
        ..Default::default()
    };
    let config = AuditConfig::load(project.path(), Some(&cli)).unwrap();
    let standards = config.standards.resolve();

    // User layer survives where nothing overrides it.
    assert_eq!(standards.revision, "user revision");
    // Project overrides user.
    assert_eq!(standards.depth_floor, 2_000_000);
    // Env overrides project.
    assert_eq!(standards.processing_lab, "/labs/env-lab/");
    // CLI overrides env.
    assert_eq!(config.batch.threads, Some(8));

    isolate_env(home.path());
}

#[test]
fn test_load_without_files_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let project = tempdir();
    let config = AuditConfig::load(project.path(), None).unwrap();
    let standards = config.standards.resolve();

    assert_eq!(standards.depth_floor, 10_000_000);
    assert_eq!(standards.processing_lab, "/labs/encode-processing-pipeline/");
    assert_eq!(standards.tiers(), Some((20_000_000, 45_000_000)));
    assert_eq!(
        standards.special_assay_minimum("single cell isolation followed by RNA-seq"),
        Some(5_000_000)
    );
    assert!(!standards.check_signal_step_runs);
    assert!(config.batch.effective_parallel());
}

#[test]
fn test_env_bool_override() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::env::set_var("SEQAUDIT_SIGNAL_STEP_RUNS", "true");
    std::env::set_var("SEQAUDIT_PARALLEL", "false");
    let project = tempdir();
    let config = AuditConfig::load(project.path(), None).unwrap();
    assert!(config.standards.resolve().check_signal_step_runs);
    assert!(!config.batch.effective_parallel());

    isolate_env(home.path());
}

#[test]
fn test_invalid_env_value_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::env::set_var("SEQAUDIT_DEPTH_FLOOR", "lots");
    let project = tempdir();
    let config = AuditConfig::load(project.path(), None).unwrap();
    assert_eq!(config.standards.resolve().depth_floor, 10_000_000);

    isolate_env(home.path());
}

#[test]
fn test_cli_disabled_rules_append_once() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let project = tempdir();
    std::fs::write(
        project.path().join("seqaudit.toml"),
        r#"
[rules]
disabled = ["file_size"]
"#,
    )
    .unwrap();
    let cli = CliOverrides {
        disabled_rules: vec!["file_size".to_string(), "file_flowcells".to_string()],
        ..Default::default()
    };
    let config = AuditConfig::load(project.path(), Some(&cli)).unwrap();
    assert_eq!(config.rules.disabled, vec!["file_size", "file_flowcells"]);
}

#[test]
fn test_malformed_project_config_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let project = tempdir();
    std::fs::write(project.path().join("seqaudit.toml"), "[standards\nbroken").unwrap();
    let err = AuditConfig::load(project.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_depth_tables_merge_per_key() {
    let config = AuditConfig::from_toml(
        r#"
[standards.read_depth]
"Histone ChIP-seq" = { narrow = 10_000_000, broad = 20_000_000 }
"RAMPAGE (paired-end, stranded)" = 20_000_000

[standards.special_assay_read_depth]
"shRNA knockdown followed by RNA-seq" = 8_000_000
"#,
    )
    .unwrap();
    let standards = config.standards.resolve();
    assert_eq!(standards.tiers(), Some((10_000_000, 20_000_000)));
    assert_eq!(
        standards.requirement("RAMPAGE (paired-end, stranded)"),
        Some(DepthRequirement::Flat(20_000_000))
    );
    // Untouched entries keep their defaults.
    assert_eq!(
        standards.requirement("Small RNA-seq single-end pipeline"),
        Some(DepthRequirement::Flat(30_000_000))
    );
    assert_eq!(
        standards.special_assay_minimum("shRNA knockdown followed by RNA-seq"),
        Some(8_000_000)
    );
}

#[test]
fn test_validation_rejects_inverted_tiers() {
    let err = AuditConfig::from_toml(
        r#"
[standards.read_depth]
"Histone ChIP-seq" = { narrow = 50_000_000, broad = 20_000_000 }
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert!(field.contains("Histone ChIP-seq"));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

/// A tiered pipeline without depth thresholds would silently skip ChIP
/// classification.
#[test]
fn test_validation_rejects_tiered_pipeline_without_depth_entry() {
    let err = AuditConfig::from_toml("[standards]\ntiered_pipeline = \"Unknown pipeline\"\n")
        .unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, message } => {
            assert_eq!(field, "standards.tiered_pipeline");
            assert!(message.contains("Unknown pipeline"));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }

    let config = AuditConfig::from_toml(
        r#"
[standards]
tiered_pipeline = "Custom ChIP-seq"

[standards.read_depth]
"Custom ChIP-seq" = { narrow = 10_000_000, broad = 30_000_000 }
"#,
    )
    .unwrap();
    assert_eq!(config.standards.resolve().tiers(), Some((10_000_000, 30_000_000)));
}

#[test]
fn test_validation_rejects_zero_floor_and_threads() {
    assert!(matches!(
        AuditConfig::from_toml("[standards]\ndepth_floor = 0\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
    assert!(matches!(
        AuditConfig::from_toml("[batch]\nthreads = 0\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
    assert!(matches!(
        AuditConfig::from_toml("[standards]\nprocessing_lab = \"  \"\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_funding_category_overrides_round_trip() {
    let config = AuditConfig::from_toml(
        r#"
[rules.funding_categories]
file_flowcells = ["GGR"]
"#,
    )
    .unwrap();
    assert_eq!(
        config.rules.categories_for("file_flowcells"),
        Some(&["GGR".to_string()][..])
    );
    let rendered = config.to_toml().unwrap();
    let reparsed = AuditConfig::from_toml(&rendered).unwrap();
    assert_eq!(
        reparsed.rules.categories_for("file_flowcells"),
        Some(&["GGR".to_string()][..])
    );
    assert!(reparsed.rules.categories_for("file_size").is_none());
}
