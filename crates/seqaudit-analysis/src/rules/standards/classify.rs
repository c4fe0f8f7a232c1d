//! Threshold classification of read depths.

use seqaudit_core::config::{DepthRequirement, Standards};

use crate::audit::Finding;

/// The file being classified.
#[derive(Debug, Clone, Copy)]
pub struct DepthSubject<'a> {
    pub file: &'a str,
    pub dataset: Option<&'a str>,
    pub depth: u64,
    pub target: Option<&'a str>,
}

/// Whether the subject is the experiment alignment or its paired control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthRole<'a> {
    Experiment,
    /// A control alignment, judged against the target of the experiment it controls.
    Control { paired_target: Option<&'a str> },
}

/// Classify a tiered-pipeline depth. At most one finding is produced.
pub fn classify_chip_depth(
    subject: &DepthSubject<'_>,
    role: DepthRole<'_>,
    standards: &Standards,
) -> Option<Finding> {
    let (narrow, broad) = standards.tiers()?;
    let floor = standards.depth_floor;
    let revision = &standards.revision;
    let depth = subject.depth;
    let file = subject.file;

    match role {
        DepthRole::Control { paired_target } => {
            let target = subject.target.unwrap_or("unspecified");
            if !standards.is_control_target(target) {
                return Some(Finding::warning(
                    "mismatched target of control experiment",
                    format!(
                        "Control ENCODE Processed alignment file {file} has a target {target} \
                         that is not a control target."
                    ),
                ));
            }
            let paired = paired_target?;
            let prefix = format!(
                "Control ENCODE Processed alignment file {file} has {depth} usable fragments. \
                 Control for ChIP-seq assays and target {paired} requires"
            );
            if standards.is_broad_mark(paired) {
                if depth >= narrow && depth < broad {
                    Some(Finding::not_compliant(
                        "control low read depth",
                        format!("{prefix} {broad} usable fragments, according to {revision} standards."),
                    ))
                } else if depth < narrow {
                    Some(Finding::not_compliant(
                        "control insufficient read depth",
                        format!(
                            "{prefix} {broad} usable fragments, according to {revision} standards, \
                             and {narrow} usable fragments at minimum."
                        ),
                    ))
                } else {
                    None
                }
            } else if depth >= floor && depth < narrow {
                Some(Finding::warning(
                    "control low read depth",
                    format!("{prefix} {narrow} usable fragments, according to {revision} standards."),
                ))
            } else if depth < floor {
                Some(Finding::not_compliant(
                    "control insufficient read depth",
                    format!(
                        "{prefix} {narrow} usable fragments, according to {revision} standards, \
                         and {floor} usable fragments at minimum."
                    ),
                ))
            } else {
                None
            }
        }
        DepthRole::Experiment => {
            let Some(target) = subject.target else {
                return Some(Finding::error(
                    "ChIP-seq missing target",
                    format!(
                        "ENCODE Processed alignment file {file} belongs to ChIP-seq experiment {} \
                         with no target specified.",
                        subject.dataset.unwrap_or("unknown")
                    ),
                ));
            };

            if standards.is_control_target(target) {
                let prefix = format!(
                    "ENCODE Processed alignment file {file} has {depth} usable fragments. \
                     It cannot be used as a control in experiments studying"
                );
                if depth >= narrow && depth < broad {
                    Some(Finding::warning(
                        "insufficient read depth",
                        format!(
                            "{prefix} broad histone marks, which require {broad} usable fragments, \
                             according to {revision} standards."
                        ),
                    ))
                } else if depth >= floor && depth < narrow {
                    Some(Finding::warning(
                        "low read depth",
                        format!(
                            "{prefix} narrow histone marks or transcription factors, which require \
                             {narrow} usable fragments, according to {revision} standards."
                        ),
                    ))
                } else if depth < floor {
                    Some(Finding::not_compliant(
                        "insufficient read depth",
                        format!(
                            "{prefix} narrow histone marks or transcription factors, which require \
                             {narrow} usable fragments, according to {revision} standards, and \
                             {floor} usable fragments at minimum."
                        ),
                    ))
                } else {
                    None
                }
            } else {
                let prefix = format!(
                    "ENCODE Processed alignment file {file} has {depth} usable fragments. \
                     Replicates for ChIP-seq assays and target {target} require"
                );
                if standards.is_broad_mark(target) {
                    if depth >= narrow && depth < broad {
                        Some(Finding::not_compliant(
                            "low read depth",
                            format!("{prefix} {broad} usable fragments, according to {revision} standards."),
                        ))
                    } else if depth < narrow {
                        Some(Finding::not_compliant(
                            "insufficient read depth",
                            format!(
                                "{prefix} {broad} usable fragments, according to {revision} standards, \
                                 and {narrow} usable fragments at minimum."
                            ),
                        ))
                    } else {
                        None
                    }
                } else if depth >= floor && depth < narrow {
                    Some(Finding::warning(
                        "low read depth",
                        format!("{prefix} {narrow} usable fragments, according to {revision} standards."),
                    ))
                } else if depth < floor {
                    Some(Finding::not_compliant(
                        "insufficient read depth",
                        format!(
                            "{prefix} {narrow} usable fragments, according to {revision} standards, \
                             and {floor} usable fragments at minimum."
                        ),
                    ))
                } else {
                    None
                }
            }
        }
    }
}

/// Classify a depth against a flat minimum: the special-assay minimum when
/// the assay has one, otherwise the pipeline's own minimum.
pub fn classify_flat_depth(
    file: &str,
    depth: u64,
    pipeline: &str,
    assay: Option<&str>,
    standards: &Standards,
) -> Option<Finding> {
    let minimum = match assay.and_then(|a| standards.special_assay_minimum(a)) {
        Some(minimum) => minimum,
        None => match standards.requirement(pipeline)? {
            DepthRequirement::Flat(minimum) => minimum,
            DepthRequirement::Tiered { narrow, .. } => narrow,
        },
    };
    (depth < minimum).then(|| {
        Finding::not_compliant(
            "insufficient read depth",
            format!(
                "ENCODE Processed alignment file {file} has {depth} uniquely mapped reads. \
                 Replicates for this assay {pipeline} require {minimum}"
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Severity;

    fn subject(depth: u64, target: Option<&str>) -> DepthSubject<'_> {
        DepthSubject {
            file: "/files/ENCFF000AAA/",
            dataset: Some("/experiments/ENCSR000AAA/"),
            depth,
            target,
        }
    }

    #[test]
    fn narrow_target_between_floor_and_narrow_warns() {
        let standards = Standards::default();
        let finding = classify_chip_depth(
            &subject(15_000_000, Some("H3K4me3-human")),
            DepthRole::Experiment,
            &standards,
        )
        .unwrap();
        assert_eq!(finding.code, "low read depth");
        assert_eq!(finding.severity, Severity::Warning);
    }

    #[test]
    fn below_floor_is_not_compliant() {
        let standards = Standards::default();
        let finding = classify_chip_depth(
            &subject(5_000_000, Some("CTCF-human")),
            DepthRole::Experiment,
            &standards,
        )
        .unwrap();
        assert_eq!(finding.code, "insufficient read depth");
        assert_eq!(finding.severity, Severity::NotCompliant);
    }

    #[test]
    fn missing_target_is_an_error() {
        let standards = Standards::default();
        let finding =
            classify_chip_depth(&subject(50_000_000, None), DepthRole::Experiment, &standards)
                .unwrap();
        assert_eq!(finding.code, "ChIP-seq missing target");
        assert_eq!(finding.severity, Severity::Error);
    }

    #[test]
    fn control_with_non_control_target_is_mismatched() {
        let standards = Standards::default();
        let finding = classify_chip_depth(
            &subject(50_000_000, Some("CTCF-human")),
            DepthRole::Control {
                paired_target: Some("H3K27me3-human"),
            },
            &standards,
        )
        .unwrap();
        assert_eq!(finding.code, "mismatched target of control experiment");
        assert_eq!(finding.severity, Severity::Warning);
    }

    #[test]
    fn control_for_broad_mark_uses_broad_tier() {
        let standards = Standards::default();
        let finding = classify_chip_depth(
            &subject(30_000_000, Some("Control-human")),
            DepthRole::Control {
                paired_target: Some("H3K27me3-human"),
            },
            &standards,
        )
        .unwrap();
        assert_eq!(finding.code, "control low read depth");
        assert_eq!(finding.severity, Severity::NotCompliant);

        let none = classify_chip_depth(
            &subject(30_000_000, Some("Control-human")),
            DepthRole::Control {
                paired_target: Some("CTCF-human"),
            },
            &standards,
        );
        assert!(none.is_none());
    }

    #[test]
    fn flat_depth_prefers_special_assay_minimum() {
        let standards = Standards::default();
        let pipeline = "RNA-seq of long RNAs (paired-end, stranded)";
        assert!(classify_flat_depth(
            "/files/ENCFF000AAA/",
            12_000_000,
            pipeline,
            Some("shRNA knockdown followed by RNA-seq"),
            &standards,
        )
        .is_none());
        let finding =
            classify_flat_depth("/files/ENCFF000AAA/", 12_000_000, pipeline, None, &standards)
                .unwrap();
        assert_eq!(finding.severity, Severity::NotCompliant);
    }
}
