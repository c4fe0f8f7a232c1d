//! Rule table configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-rule switches applied when the rule table is built.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuleConfig {
    /// Rule names to leave out of the table.
    pub disabled: Vec<String>,
    /// Funding-category whitelist overrides, keyed by rule name.
    pub funding_categories: BTreeMap<String, Vec<String>>,
}

impl RuleConfig {
    pub fn is_disabled(&self, rule: &str) -> bool {
        self.disabled.iter().any(|r| r == rule)
    }

    /// Whitelist override for `rule`, if configured.
    pub fn categories_for(&self, rule: &str) -> Option<&[String]> {
        self.funding_categories.get(rule).map(Vec::as_slice)
    }
}
