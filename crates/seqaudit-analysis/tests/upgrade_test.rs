//! Schema upgrade chain for datasets and donors.

use serde_json::json;

use seqaudit_analysis::upgrade::{standard_upgrades, UpgradeLookups, UpgradeRegistry};
use seqaudit_core::errors::{AuditErrorCode, UpgradeError};

const ENCODE2_AWARD: &str = "7fd6664b-8c9e-4d87-b4d0-4c8a0d4a2b2e";
const EXPERIMENT_UUID: &str = "a357b33b-cdaa-4312-91c0-086bfec24181";

fn lookups() -> UpgradeLookups {
    let mut lookups = UpgradeLookups::default();
    lookups.encode2_awards.insert(ENCODE2_AWARD.to_string());
    lookups
        .file_datasets
        .insert("file-own".to_string(), EXPERIMENT_UUID.to_string());
    lookups
        .file_datasets
        .insert("file-other".to_string(), "another-dataset".to_string());
    lookups
        .publications
        .insert("PMID:19352372".to_string(), "pub-uuid-1".to_string());
    lookups
}

fn registry() -> UpgradeRegistry {
    standard_upgrades().with_lookups(lookups())
}

#[test]
fn test_dataset_full_chain() {
    let original = json!({
        "uuid": EXPERIMENT_UUID,
        "award": ENCODE2_AWARD,
        "status": "CURRENT",
        "files": ["file-own", "file-other"],
        "encode2_dbxrefs": ["wgEncodeEH000325", "wgEncodeEM001234", "unrelated"],
        "geo_dbxrefs": ["GSM99999"],
        "aliases": ["ucsc_encode_db:hg19-wgEncodeSydhTfbs", "lab:keep-me", "lab:keep-me"],
        "biosample_type": "primary cell line",
        "references": ["PMID:19352372", "PMID:19352372"],
        "dataset_type": "experiment"
    });
    let upgraded = registry().upgrade("experiment", original, "", "8").unwrap();

    assert_eq!(upgraded["status"], "released");
    assert_eq!(upgraded["related_files"], json!(["file-other"]));
    assert!(upgraded.get("files").is_none());
    assert_eq!(
        upgraded["dbxrefs"],
        json!([
            "UCSC-ENCODE-hg19:wgEncodeEH000325",
            "UCSC-ENCODE-mm9:wgEncodeEM001234",
            "GEO:GSM99999",
            "UCSC-GB-hg19:wgEncodeSydhTfbs"
        ])
    );
    assert_eq!(upgraded["aliases"], json!(["lab:keep-me"]));
    assert_eq!(upgraded["biosample_type"], "primary cell");
    assert_eq!(upgraded["references"], json!(["pub-uuid-1"]));
    assert!(upgraded.get("dataset_type").is_none());
}

/// ENCODE2 track names anywhere in a dbxref or alias map to their assembly.
#[test]
fn test_encode2_track_names_map_to_assembly() {
    let upgraded = registry()
        .upgrade(
            "experiment",
            json!({
                "encode2_dbxrefs": ["prefix-wgEncodeEM000001"],
                "aliases": [
                    "ucsc_encode_db:wgEncodeEH000777",
                    "ucsc_encode_db:wgEncodeEM000888",
                    "lab:wgEncodeXX000999"
                ]
            }),
            "2",
            "3",
        )
        .unwrap();
    assert_eq!(
        upgraded["dbxrefs"],
        json!([
            "UCSC-ENCODE-mm9:prefix-wgEncodeEM000001",
            "UCSC-ENCODE-hg19:wgEncodeEH000777",
            "UCSC-ENCODE-mm9:wgEncodeEM000888"
        ])
    );
    assert_eq!(upgraded["aliases"], json!(["lab:wgEncodeXX000999"]));
}

#[test]
fn test_dataset_status_defaults_from_award() {
    let registry = registry();
    let encode3 = registry
        .upgrade("annotation", json!({"award": "other-award"}), "3", "4")
        .unwrap();
    assert_eq!(encode3["status"], "submitted");

    let encode2 = registry
        .upgrade("annotation", json!({"award": ENCODE2_AWARD}), "3", "4")
        .unwrap();
    assert_eq!(encode2["status"], "released");

    let deleted = registry
        .upgrade("annotation", json!({"status": "DELETED"}), "3", "4")
        .unwrap();
    assert_eq!(deleted["status"], "deleted");
}

#[test]
fn test_paired_set_loses_file_lists() {
    let upgraded = registry()
        .upgrade(
            "project",
            json!({
                "dataset_type": "paired set",
                "related_files": ["a"],
                "contributing_files": ["b"],
                "revoked_files": ["c"]
            }),
            "6",
            "7",
        )
        .unwrap();
    assert_eq!(upgraded, json!({"related_datasets": []}));
}

#[test]
fn test_donor_steps() {
    let registry = registry();

    let mouse = registry
        .upgrade(
            "mouse_donor",
            json!({"status": "CURRENT", "sex": "female", "parents": ["p"], "strain": "B6"}),
            "",
            "3",
        )
        .unwrap();
    assert_eq!(mouse, json!({"status": "in progress", "strain": "B6"}));

    let human = registry
        .upgrade("human_donor", json!({"age": "32.0"}), "2", "3")
        .unwrap();
    assert_eq!(human["age"], "32");
    let range = registry
        .upgrade("human_donor", json!({"age": "20.0-30.0"}), "2", "3")
        .unwrap();
    assert_eq!(range["age"], "20-30");
    let untouched = registry
        .upgrade("human_donor", json!({"age": "32.05"}), "2", "3")
        .unwrap();
    assert_eq!(untouched["age"], "32.05");

    // No status recorded stays unrecorded for donors.
    let unset = registry.upgrade("human_donor", json!({}), "", "2").unwrap();
    assert!(unset.get("status").is_none());

    let worm = registry
        .upgrade("worm_donor", json!({"aliases": ["x", "y", "x"]}), "1", "2")
        .unwrap();
    assert_eq!(worm["aliases"], json!(["x", "y"]));
}

#[test]
fn test_unresolved_reference_fails() {
    let err = registry()
        .upgrade("human_donor", json!({"references": ["PMID:1"]}), "3", "4")
        .unwrap_err();
    assert!(matches!(
        err,
        UpgradeError::UnresolvedReference { ref reference, .. } if reference == "PMID:1"
    ));
    assert_eq!(err.error_code(), "UPGRADE_ERROR");
}

#[test]
fn test_chain_errors() {
    let registry = registry();
    assert!(matches!(
        registry.upgrade("experiment", json!([1, 2]), "", "8"),
        Err(UpgradeError::NotAnObject { .. })
    ));
    assert!(matches!(
        registry.upgrade("experiment", json!({}), "8", "3"),
        Err(UpgradeError::Downgrade { .. })
    ));
    // matched_set stops at 7.
    assert!(matches!(
        registry.upgrade("matched_set", json!({}), "7", "8"),
        Err(UpgradeError::MissingStep { ref from, .. }) if from == "7"
    ));
    assert!(matches!(
        registry.upgrade("biosample", json!({}), "1", "2"),
        Err(UpgradeError::MissingStep { .. })
    ));
    assert!(matches!(
        registry.upgrade("experiment", json!({"aliases": "not-a-list"}), "7", "8"),
        Err(UpgradeError::InvalidField { ref field, .. }) if field == "aliases"
    ));
}

#[test]
fn test_same_version_is_identity() {
    let value = json!({"status": "CURRENT"});
    let upgraded = registry().upgrade("experiment", value.clone(), "5", "5").unwrap();
    assert_eq!(upgraded, value);
}

#[test]
fn test_registered_steps() {
    let registry = standard_upgrades();
    assert!(registry.has_step("experiment", ""));
    assert!(registry.has_step("treatment_time_series", "7"));
    assert!(!registry.has_step("treatment_time_series", "6"));
    assert!(registry.has_step("fly_donor", "1"));
    assert!(!registry.is_empty());
}
