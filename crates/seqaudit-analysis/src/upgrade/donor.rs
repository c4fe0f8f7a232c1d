//! Upgrade steps for donors.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use seqaudit_core::errors::UpgradeError;

use super::{dedupe_fields, normalise_legacy_status, references_to_uuids, JsonObject, UpgradeContext, UpgradeRegistry};

const HUMAN_MOUSE: &[&str] = &["human_donor", "mouse_donor"];
const FLY_WORM: &[&str] = &["fly_donor", "worm_donor"];

/// Whole-number ages recorded as floats, optionally as a range: `32.0`, `20.0-30.0`.
static FLOAT_AGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.0(-\d+\.0)?$").expect("valid float age pattern"));

pub fn register(registry: &mut UpgradeRegistry) {
    registry
        .register_all(HUMAN_MOUSE, "", "2", donor_0_2)
        .register("mouse_donor", "2", "3", mouse_donor_2_3)
        .register("human_donor", "2", "3", human_donor_2_3)
        .register_all(HUMAN_MOUSE, "3", "4", donor_3_4)
        .register_all(HUMAN_MOUSE, "4", "5", donor_4_5)
        .register_all(FLY_WORM, "1", "2", fly_worm_donor_1_2);
}

/// Legacy statuses; `CURRENT` outside ENCODE2 becomes `in progress`.
pub fn donor_0_2(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    normalise_legacy_status(object, ctx, "in progress", false);
    Ok(())
}

/// Mouse donors lose sex and kinship fields.
pub fn mouse_donor_2_3(object: &mut JsonObject, _ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    for field in [
        "sex",
        "parents",
        "children",
        "siblings",
        "fraternal_twin",
        "identical_twin",
    ] {
        object.remove(field);
    }
    Ok(())
}

/// Float ages become integers.
pub fn human_donor_2_3(object: &mut JsonObject, _ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    let Some(age) = object.get("age").and_then(Value::as_str) else {
        return Ok(());
    };
    if FLOAT_AGE.is_match(age) {
        let normalised = age.replace(".0", "");
        object.insert("age".to_string(), Value::from(normalised));
    }
    Ok(())
}

pub fn donor_3_4(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    references_to_uuids(object, ctx)
}

pub fn donor_4_5(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    dedupe_fields(
        object,
        &[
            "aliases",
            "dbxrefs",
            "references",
            "littermates",
            "parents",
            "children",
            "siblings",
        ],
        ctx,
    )
}

pub fn fly_worm_donor_1_2(object: &mut JsonObject, ctx: &UpgradeContext<'_>) -> Result<(), UpgradeError> {
    dedupe_fields(object, &["aliases", "documents", "dbxrefs", "constructs"], ctx)
}
