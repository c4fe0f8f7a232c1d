//! Schema upgrade chain for stored items.
//!
//! Each step rewrites a JSON object from one schema version to the next.
//! Steps are keyed by `(item type, from version)`; `upgrade` follows the
//! chain until the requested version is reached.

pub mod dataset;
pub mod donor;

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use seqaudit_core::errors::UpgradeError;

pub type JsonObject = Map<String, Value>;

/// A single upgrade step. Steps mutate the object in place.
pub type UpgradeFn = fn(&mut JsonObject, &UpgradeContext<'_>) -> Result<(), UpgradeError>;

/// Lookup tables for steps that consult other stored items.
#[derive(Debug, Clone, Default)]
pub struct UpgradeLookups {
    /// Awards whose `CURRENT` items count as released.
    pub encode2_awards: BTreeSet<String>,
    /// File uuid to the uuid of the dataset owning it.
    pub file_datasets: BTreeMap<String, String>,
    /// Publication reference (doi or path) to publication uuid.
    pub publications: BTreeMap<String, String>,
}

/// What a step knows about the item it rewrites.
pub struct UpgradeContext<'a> {
    pub item_type: &'a str,
    pub lookups: &'a UpgradeLookups,
}

impl UpgradeContext<'_> {
    pub fn invalid_field(&self, field: &str, message: impl Into<String>) -> UpgradeError {
        UpgradeError::InvalidField {
            item_type: self.item_type.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn unresolved(&self, field: &str, reference: &str) -> UpgradeError {
        UpgradeError::UnresolvedReference {
            item_type: self.item_type.to_string(),
            field: field.to_string(),
            reference: reference.to_string(),
        }
    }
}

struct RegisteredStep {
    to: String,
    step: UpgradeFn,
}

/// Upgrade steps by item type and source version.
#[derive(Default)]
pub struct UpgradeRegistry {
    steps: BTreeMap<(String, String), RegisteredStep>,
    lookups: UpgradeLookups,
}

impl UpgradeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookups(mut self, lookups: UpgradeLookups) -> Self {
        self.lookups = lookups;
        self
    }

    pub fn register(&mut self, item_type: &str, from: &str, to: &str, step: UpgradeFn) -> &mut Self {
        self.steps.insert(
            (item_type.to_string(), from.to_string()),
            RegisteredStep {
                to: to.to_string(),
                step,
            },
        );
        self
    }

    /// Register one step for several item types.
    pub fn register_all(
        &mut self,
        item_types: &[&str],
        from: &str,
        to: &str,
        step: UpgradeFn,
    ) -> &mut Self {
        for item_type in item_types {
            self.register(item_type, from, to, step);
        }
        self
    }

    pub fn has_step(&self, item_type: &str, from: &str) -> bool {
        self.steps
            .contains_key(&(item_type.to_string(), from.to_string()))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Upgrade `value` of `item_type` from schema version `from` to `to`.
    /// The empty version string is the unversioned original schema.
    pub fn upgrade(
        &self,
        item_type: &str,
        value: Value,
        from: &str,
        to: &str,
    ) -> Result<Value, UpgradeError> {
        let Value::Object(mut object) = value else {
            return Err(UpgradeError::NotAnObject {
                item_type: item_type.to_string(),
            });
        };
        let target = version_number(to);
        if let (Some(start), Some(end)) = (version_number(from), target) {
            if end < start {
                return Err(UpgradeError::Downgrade {
                    item_type: item_type.to_string(),
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }

        let ctx = UpgradeContext {
            item_type,
            lookups: &self.lookups,
        };
        let mut current = from.to_string();
        while current != to {
            let overshot = matches!(
                (version_number(&current), target),
                (Some(at), Some(end)) if at > end
            );
            let entry = self
                .steps
                .get(&(item_type.to_string(), current.clone()))
                .filter(|_| !overshot)
                .ok_or_else(|| UpgradeError::MissingStep {
                    item_type: item_type.to_string(),
                    from: current.clone(),
                })?;
            (entry.step)(&mut object, &ctx)?;
            tracing::debug!(item_type, from = %current, to = %entry.to, "upgrade step applied");
            current = entry.to.clone();
        }
        Ok(Value::Object(object))
    }
}

/// Every dataset and donor step.
pub fn standard_upgrades() -> UpgradeRegistry {
    let mut registry = UpgradeRegistry::new();
    dataset::register(&mut registry);
    donor::register(&mut registry);
    registry
}

/// Numeric schema version; the empty string is version 0.
pub fn version_number(version: &str) -> Option<u32> {
    if version.is_empty() {
        return Some(0);
    }
    version.parse().ok()
}

/// Remove repeated entries from each listed array field, keeping first occurrences.
pub fn dedupe_fields(
    object: &mut JsonObject,
    fields: &[&str],
    ctx: &UpgradeContext<'_>,
) -> Result<(), UpgradeError> {
    for field in fields {
        let Some(value) = object.get_mut(*field) else {
            continue;
        };
        let Value::Array(items) = value else {
            return Err(ctx.invalid_field(field, "expected an array"));
        };
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items.drain(..) {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        *items = unique;
    }
    Ok(())
}

/// A string-array field, or `None` when absent.
pub fn string_list(
    object: &JsonObject,
    field: &str,
    ctx: &UpgradeContext<'_>,
) -> Result<Option<Vec<String>>, UpgradeError> {
    let Some(value) = object.get(field) else {
        return Ok(None);
    };
    let Value::Array(items) = value else {
        return Err(ctx.invalid_field(field, "expected an array of strings"));
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ctx.invalid_field(field, format!("non-string entry {item}")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Legacy `DELETED` / `CURRENT` statuses. `CURRENT` resolves by award:
/// ENCODE2 awards are released, everything else gets `otherwise`.
/// `default_when_absent` also assigns a status when none is recorded.
pub(crate) fn normalise_legacy_status(
    object: &mut JsonObject,
    ctx: &UpgradeContext<'_>,
    otherwise: &str,
    default_when_absent: bool,
) {
    let award_status = |object: &JsonObject| {
        let award = object.get("award").and_then(Value::as_str).unwrap_or_default();
        if ctx.lookups.encode2_awards.contains(award) {
            "released"
        } else {
            otherwise
        }
    };
    let replacement = match object.get("status").and_then(Value::as_str) {
        Some("DELETED") => Some("deleted"),
        Some("CURRENT") => Some(award_status(object)),
        None if default_when_absent && !object.contains_key("status") => Some(award_status(object)),
        _ => None,
    };
    if let Some(status) = replacement {
        object.insert("status".to_string(), Value::from(status));
    }
}

/// Rewrite `references` to publication uuids.
pub(crate) fn references_to_uuids(
    object: &mut JsonObject,
    ctx: &UpgradeContext<'_>,
) -> Result<(), UpgradeError> {
    let Some(references) = string_list(object, "references", ctx)? else {
        return Ok(());
    };
    let uuids = references
        .iter()
        .map(|reference| {
            ctx.lookups
                .publications
                .get(reference)
                .map(|uuid| Value::from(uuid.as_str()))
                .ok_or_else(|| ctx.unresolved("references", reference))
        })
        .collect::<Result<Vec<_>, _>>()?;
    object.insert("references".to_string(), Value::Array(uuids));
    Ok(())
}
