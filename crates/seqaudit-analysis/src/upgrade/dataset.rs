//! Upgrade steps for the dataset family.

use serde_json::Value;

use seqaudit_core::errors::UpgradeError;

use super::{
    dedupe_fields, normalise_legacy_status, references_to_uuids, string_list, JsonObject,
    UpgradeContext, UpgradeRegistry,
};

/// Dataset types sharing the early schema history.
pub const DATASET_TYPES: &[&str] = &[
    "experiment",
    "annotation",
    "matched_set",
    "project",
    "publication_data",
    "reference",
    "ucsc_browser_composite",
];

/// Types carrying the 7 to 8 de-duplication step.
pub const DATASET_TYPES_V8: &[&str] = &[
    "experiment",
    "annotation",
    "reference",
    "project",
    "publication_data",
    "ucsc_browser_composite",
    "organism_development_series",
    "reference_epigenome",
    "replication_timing_series",
    "treatment_time_series",
    "treatment_concentration_series",
];

/// UCSC track name fragments of human and mouse ENCODE2 experiments.
const HUMAN_TRACK: &str = "wgEncodeEH";
const MOUSE_TRACK: &str = "wgEncodeEM";

pub fn register(registry: &mut UpgradeRegistry) {
    registry
        .register_all(DATASET_TYPES, "", "2", dataset_0_2)
        .register_all(DATASET_TYPES, "2", "3", dataset_2_3)
        .register_all(DATASET_TYPES, "3", "4", dataset_3_4)
        .register_all(DATASET_TYPES, "4", "5", dataset_4_5)
        .register_all(DATASET_TYPES, "5", "6", dataset_5_6)
        .register_all(DATASET_TYPES, "6", "7", dataset_6_7)
        .register_all(DATASET_TYPES_V8, "7", "8", dataset_7_8);
}

/// `files` becomes `related_files`, keeping only files owned by other datasets.
pub fn dataset_0_2(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    let Some(files) = string_list(object, "files", ctx)? else {
        return Ok(());
    };
    let own_uuid = object
        .get("uuid")
        .and_then(Value::as_str)
        .ok_or_else(|| ctx.invalid_field("uuid", "required to split files"))?
        .to_string();
    let mut related = Vec::new();
    for file in files {
        let owner = ctx
            .lookups
            .file_datasets
            .get(&file)
            .ok_or_else(|| ctx.unresolved("files", &file))?;
        if *owner != own_uuid {
            related.push(Value::from(file));
        }
    }
    object.remove("files");
    object.insert("related_files".to_string(), Value::Array(related));
    Ok(())
}

/// Consolidate ENCODE2, GEO and UCSC cross references into `dbxrefs`.
pub fn dataset_2_3(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    let mut dbxrefs: Vec<Value> = Vec::new();

    if let Some(encode2) = string_list(object, "encode2_dbxrefs", ctx)? {
        for xref in encode2 {
            if xref.contains(HUMAN_TRACK) {
                dbxrefs.push(Value::from(format!("UCSC-ENCODE-hg19:{xref}")));
            } else if xref.contains(MOUSE_TRACK) {
                dbxrefs.push(Value::from(format!("UCSC-ENCODE-mm9:{xref}")));
            } else {
                tracing::debug!(xref = %xref, "unrecognised ENCODE2 dbxref dropped");
            }
        }
        object.remove("encode2_dbxrefs");
    }

    if let Some(geo) = string_list(object, "geo_dbxrefs", ctx)? {
        dbxrefs.extend(geo.into_iter().map(|xref| Value::from(format!("GEO:{xref}"))));
        object.remove("geo_dbxrefs");
    }

    if let Some(aliases) = string_list(object, "aliases", ctx)? {
        let mut kept = Vec::new();
        for alias in aliases {
            let converted = if let Some(rest) = alias.strip_prefix("ucsc_encode_db:hg19-") {
                Some(format!("UCSC-GB-hg19:{rest}"))
            } else if let Some(rest) = alias.strip_prefix("ucsc_encode_db:mm9-") {
                Some(format!("UCSC-GB-mm9:{rest}"))
            } else if alias.contains(HUMAN_TRACK) {
                Some(alias.replace("ucsc_encode_db:", "UCSC-ENCODE-hg19:"))
            } else if alias.contains(MOUSE_TRACK) {
                Some(alias.replace("ucsc_encode_db:", "UCSC-ENCODE-mm9:"))
            } else {
                None
            };
            match converted {
                Some(xref) => dbxrefs.push(Value::from(xref)),
                None => kept.push(Value::from(alias)),
            }
        }
        object.insert("aliases".to_string(), Value::Array(kept));
    }

    object.insert("dbxrefs".to_string(), Value::Array(dbxrefs));
    Ok(())
}

/// Legacy statuses; unset statuses are assigned from the award.
pub fn dataset_3_4(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    normalise_legacy_status(object, ctx, "submitted", true);
    Ok(())
}

pub fn dataset_4_5(object: &mut JsonObject, _ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    if object.get("biosample_type").and_then(Value::as_str) == Some("primary cell line") {
        object.insert("biosample_type".to_string(), Value::from("primary cell"));
    }
    Ok(())
}

/// References become publication uuids.
pub fn dataset_5_6(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    references_to_uuids(object, ctx)
}

/// `dataset_type` is dropped; paired sets lose their file lists.
pub fn dataset_6_7(object: &mut JsonObject, _ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    let Some(dataset_type) = object.remove("dataset_type") else {
        return Ok(());
    };
    if dataset_type.as_str() == Some("paired set") {
        for field in ["related_files", "contributing_files", "revoked_files"] {
            object.remove(field);
        }
        object.insert("related_datasets".to_string(), Value::Array(Vec::new()));
    }
    Ok(())
}

pub fn dataset_7_8(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    dedupe_fields(
        object,
        &[
            "possible_controls",
            "targets",
            "software_used",
            "dbxrefs",
            "aliases",
            "references",
            "documents",
            "related_files",
        ],
        ctx,
    )
}
