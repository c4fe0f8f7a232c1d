//! The file audit rules and the default rule table.

pub mod library_complexity;
pub mod metadata;
pub mod modern;
pub mod replicate_concordance;
pub mod replicates;
pub mod sequencing;
pub mod standards;
pub mod support;

use seqaudit_core::config::RuleConfig;
use seqaudit_core::model::EntityKind;

use crate::audit::{Condition, RuleRegistry};
use crate::frame::Frame;

pub use library_complexity::LibraryComplexityCheck;
pub use metadata::{ControlledByCheck, FormatSpecificationsCheck};
pub use modern::ModernChipStepsCheck;
pub use replicate_concordance::ReplicateConcordanceCheck;
pub use replicates::{BiologicalReplicateMatchCheck, PairedWithCheck, ReplicateMatchCheck};
pub use sequencing::{
    FileSizeCheck, FlowcellsCheck, PairedEndedRunTypeCheck, PlatformCheck, ReadLengthCheck,
    RunTypeCheck,
};
pub use standards::ReadDepthCheck;

/// Build the file rule table, honouring disabled rules and category overrides.
pub fn standard_registry(config: &RuleConfig) -> RuleRegistry {
    let file = EntityKind::File;
    let mut registry = RuleRegistry::new();
    registry
        .register_configured(
            config,
            file,
            Frame::new(&[
                "replicate",
                "replicate.experiment",
                "derived_from",
                "derived_from.replicate",
                "derived_from.replicate.experiment",
            ]),
            Condition::Always,
            Box::new(BiologicalReplicateMatchCheck),
        )
        .register_configured(
            config,
            file,
            Frame::new(&["replicate", "dataset", "replicate.experiment"]),
            Condition::Always,
            Box::new(ReplicateMatchCheck),
        )
        .register_configured(
            config,
            file,
            Frame::object(),
            Condition::rfa(&["ENCODE3", "modERN", "ENCODE2", "ENCODE2-Mouse"]),
            Box::new(PlatformCheck),
        )
        .register_configured(
            config,
            file,
            Frame::new(&["dataset"]),
            Condition::rfa(&["ENCODE3", "modERN", "ENCODE", "ENCODE2", "ENCODE2-Mouse"]),
            Box::new(ReadLengthCheck),
        )
        .register_configured(
            config,
            file,
            Frame::new(&["dataset", "dataset.target", "controlled_by", "controlled_by.dataset"]),
            Condition::rfa(&["ENCODE2", "ENCODE2-Mouse", "ENCODE3", "modERN"]),
            Box::new(ControlledByCheck),
        )
        .register_configured(
            config,
            file,
            Frame::object(),
            Condition::rfa(&["modERN", "GGR"]),
            Box::new(FlowcellsCheck),
        )
        .register_configured(
            config,
            file,
            Frame::object(),
            Condition::Always,
            Box::new(RunTypeCheck),
        )
        .register_configured(
            config,
            file,
            Frame::new(&["paired_with"]),
            Condition::Always,
            Box::new(PairedWithCheck),
        )
        .register_configured(
            config,
            file,
            Frame::new(&["step_run", "dataset"]),
            Condition::rfa(&["modERN"]),
            Box::new(ModernChipStepsCheck),
        )
        .register_configured(
            config,
            file,
            Frame::object(),
            Condition::Always,
            Box::new(FileSizeCheck),
        )
        .register_configured(
            config,
            file,
            Frame::new(&["file_format_specifications"]),
            Condition::Always,
            Box::new(FormatSpecificationsCheck),
        )
        .register_configured(
            config,
            file,
            Frame::object(),
            Condition::Always,
            Box::new(PairedEndedRunTypeCheck),
        )
        .register_configured(
            config,
            file,
            standards::read_depth_frame(),
            Condition::rfa(&["ENCODE3", "ENCODE"]),
            Box::new(ReadDepthCheck),
        )
        .register_configured(
            config,
            file,
            library_complexity::qc_frame(),
            Condition::rfa(&["ENCODE3", "ENCODE"]),
            Box::new(LibraryComplexityCheck),
        )
        .register_configured(
            config,
            file,
            library_complexity::qc_frame(),
            Condition::rfa(&["ENCODE3", "ENCODE"]),
            Box::new(ReplicateConcordanceCheck),
        );
    tracing::debug!(rules = registry.len(), "rule table built");
    registry
}
