//! Funding-category gating.

use seqaudit_core::graph::{ProvenanceGraph, Related};
use seqaudit_core::model::Entity;

/// Applicability predicate attached to a registered rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Condition {
    /// Applies to every in-scope entity.
    #[default]
    Always,
    /// Applies only when the owning award's funding category is listed.
    FundingCategory(Vec<String>),
}

impl Condition {
    /// Shorthand for a funding-category whitelist.
    pub fn rfa(categories: &[&str]) -> Self {
        Self::FundingCategory(categories.iter().map(|c| c.to_string()).collect())
    }

    pub fn applies(&self, entity: &Entity, graph: &dyn ProvenanceGraph) -> bool {
        match self {
            Self::Always => true,
            Self::FundingCategory(allowed) => {
                applies(funding_category(entity, graph).as_deref(), allowed)
            }
        }
    }
}

/// True iff `category` is present and whitelisted.
pub fn applies(category: Option<&str>, allowed: &[String]) -> bool {
    category.is_some_and(|c| allowed.iter().any(|a| a == c))
}

/// The `rfa` of the award owning `entity`, if the award resolves.
pub fn funding_category(entity: &Entity, graph: &dyn ProvenanceGraph) -> Option<String> {
    match graph.get_related(entity, seqaudit_core::model::relations::AWARD) {
        Related::One(award) => award.as_award().and_then(|a| a.rfa.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_category_never_applies() {
        let allowed = vec!["ENCODE3".to_string()];
        assert!(!applies(None, &allowed));
        assert!(applies(Some("ENCODE3"), &allowed));
        assert!(!applies(Some("GGR"), &allowed));
    }
}
