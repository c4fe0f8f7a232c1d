//! Replicate concordance of gene quantifications.

use seqaudit_core::errors::RuleError;
use seqaudit_core::model::relations as rel;

use crate::audit::{AuditCheck, AuditContext, CheckResult, Finding};
use crate::frame::ResolvedEntity;
use crate::rules::support::{file_record, StepChain};

pub const GENE_QUANTIFICATIONS: &str = "gene quantifications";
pub const SPEARMAN_METRIC: &str = "Spearman correlation";
pub const MAD_METRIC: &str = "MAD of log ratios";

pub const ISOGENIC_SPEARMAN: f64 = 0.9;
pub const ANISOGENIC_SPEARMAN: f64 = 0.8;
/// One standard deviation below the floor is still a warning.
pub const SPEARMAN_GRACE: f64 = 0.07;
const MAD_RECOMMENDED: f64 = 0.2;
const MAD_ACCEPTABLE: f64 = 0.5;

/// Pipelines whose gene quantifications carry a MAD quality metric.
pub const MAD_PIPELINES: &[&str] = &[
    "RAMPAGE (paired-end, stranded)",
    "Small RNA-seq single-end pipeline",
    "RNA-seq of long RNAs (single-end, unstranded)",
    "RNA-seq of long RNAs (paired-end, stranded)",
];

const ANISOGENIC_TYPES: &[&str] = &[
    "anisogenic",
    "anisogenic, sex-matched and age-matched",
    "anisogenic, age-matched",
    "anisogenic, sex-matched",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replication {
    Isogenic,
    Anisogenic,
}

impl Replication {
    /// Known replicated types only; unreplicated and unknown types have no floor.
    pub fn from_type(replication_type: Option<&str>) -> Option<Self> {
        match replication_type? {
            "isogenic" => Some(Self::Isogenic),
            t if ANISOGENIC_TYPES.contains(&t) => Some(Self::Anisogenic),
            _ => None,
        }
    }

    pub fn required_spearman(&self) -> f64 {
        match self {
            Self::Isogenic => ISOGENIC_SPEARMAN,
            Self::Anisogenic => ANISOGENIC_SPEARMAN,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Isogenic => "isogenic",
            Self::Anisogenic => "anisogenic",
        }
    }
}

/// Spearman floor classification with the grace band.
pub fn classify_spearman(
    file: &str,
    correlation: f64,
    replication: Replication,
    pipeline: &str,
) -> Option<Finding> {
    let required = replication.required_spearman();
    if correlation >= required {
        return None;
    }
    let border = required - SPEARMAN_GRACE;
    let detail = format!(
        "ENCODE processed gene quantification file {file} has Spearman correlation of \
         {correlation}. For gene quantification files from an {} assay in the {pipeline} \
         pipeline, >{required} is recommended, but a value between {required} and one STD \
         away ({border:.2}) is acceptable.",
        replication.as_str()
    );
    if correlation > border {
        Some(Finding::warning("low spearman correlation", detail))
    } else {
        Some(Finding::not_compliant("insufficient spearman correlation", detail))
    }
}

/// MAD of log ratios classification.
pub fn classify_mad(file: &str, mad: f64, replication: Replication, pipeline: &str) -> Option<Finding> {
    if mad <= MAD_RECOMMENDED {
        return None;
    }
    let prefix = format!(
        "ENCODE processed gene quantification file {file} has Mean-Average-Deviation (MAD) of \
         replicate log ratios from quantification value of {mad}. For gene quantification files \
         from an {} assay in the {pipeline} pipeline,",
        replication.as_str()
    );
    match replication {
        Replication::Isogenic => {
            let detail = format!(
                "{prefix} a value <{MAD_RECOMMENDED} is recommended, but a value between \
                 {MAD_RECOMMENDED} and {MAD_ACCEPTABLE} is acceptable."
            );
            if mad < MAD_ACCEPTABLE {
                Some(Finding::warning("borderline MAD value", detail))
            } else {
                Some(Finding::not_compliant("insufficient MAD value", detail))
            }
        }
        Replication::Anisogenic if mad > MAD_ACCEPTABLE => Some(Finding::warning(
            "borderline MAD value",
            format!("{prefix} a value <{MAD_ACCEPTABLE} is recommended."),
        )),
        Replication::Anisogenic => None,
    }
}

/// `file_mad_qc_spearman_correlation`: replicate agreement of quantifications.
pub struct ReplicateConcordanceCheck;

impl ReplicateConcordanceCheck {
    pub const NAME: &'static str = "file_mad_qc_spearman_correlation";
}

impl AuditCheck for ReplicateConcordanceCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, value: &ResolvedEntity, ctx: &AuditContext<'_>) -> CheckResult {
        let file = file_record(Self::NAME, value)?;
        if file.output_type != GENE_QUANTIFICATIONS
            || file.lab.as_deref() != Some(ctx.standards.processing_lab.as_str())
        {
            return Ok(Vec::new());
        }
        let replication_type = value
            .one(rel::DATASET)
            .and_then(|d| d.as_dataset())
            .and_then(|d| d.replication_type.as_deref());
        if replication_type == Some("unreplicated") {
            return Ok(Vec::new());
        }

        const NOUN: &str = "gene quantification file";
        let chain = match StepChain::resolve(value) {
            Ok(chain) => chain,
            Err(gap) => return Ok(vec![gap.finding(value, NOUN)]),
        };
        let metrics = value.many(rel::QUALITY_METRICS);
        if metrics.is_empty() {
            return Ok(vec![Finding::dcc_action(
                "missing quality metrics",
                format!("ENCODE Processed {NOUN} {} has no quality_metrics", value.id),
            )]);
        }

        let paired = metrics
            .iter()
            .filter_map(|m| m.as_quality_metric())
            .find_map(|m| Some((m.get(SPEARMAN_METRIC)?, m.get(MAD_METRIC)?)));
        let Some((spearman, mad)) = paired else {
            return Ok(vec![Finding::dcc_action(
                "missing Spearman correlation",
                format!("ENCODE Processed {NOUN} {} has no MAD quality metric", value.id),
            )]);
        };

        let Some(replication) = Replication::from_type(replication_type) else {
            return Ok(Vec::new());
        };
        // Only the first listed pipeline is judged.
        let Some(pipeline) = chain.pipeline_titles().next() else {
            return Ok(Vec::new());
        };
        if !MAD_PIPELINES.contains(&pipeline) {
            return Ok(Vec::new());
        }

        let number = |raw: &seqaudit_core::model::MetricValue, field: &str| {
            raw.as_f64().ok_or_else(|| RuleError::MalformedValue {
                rule: Self::NAME,
                entity: value.id.to_string(),
                field: field.to_string(),
                message: format!("expected a number, found {raw:?}"),
            })
        };
        let correlation = number(spearman, SPEARMAN_METRIC)?;
        let mad = number(mad, MAD_METRIC)?;

        let file_id = value.id.as_str();
        let mut findings = Vec::new();
        findings.extend(classify_spearman(file_id, correlation, replication, pipeline));
        findings.extend(classify_mad(file_id, mad, replication, pipeline));
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Severity;

    #[test]
    fn replication_types() {
        assert_eq!(Replication::from_type(Some("isogenic")), Some(Replication::Isogenic));
        assert_eq!(
            Replication::from_type(Some("anisogenic, age-matched")),
            Some(Replication::Anisogenic)
        );
        assert_eq!(Replication::from_type(Some("unreplicated")), None);
        assert_eq!(Replication::from_type(None), None);
    }

    #[test]
    fn anisogenic_mad_between_bounds_is_silent() {
        let pipeline = MAD_PIPELINES[0];
        assert!(classify_mad("/files/F/", 0.3, Replication::Anisogenic, pipeline).is_none());
        let finding = classify_mad("/files/F/", 0.3, Replication::Isogenic, pipeline).unwrap();
        assert_eq!(finding.severity, Severity::Warning);
        let finding = classify_mad("/files/F/", 0.6, Replication::Isogenic, pipeline).unwrap();
        assert_eq!(finding.code, "insufficient MAD value");
    }
}
