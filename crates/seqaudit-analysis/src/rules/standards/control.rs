//! Control pairing through shared upstream reads.

use seqaudit_core::model::relations as rel;
use seqaudit_core::model::Entity;

use crate::frame::ResolvedEntity;
use crate::rules::support::{StepChain, BAM};

/// Locate the control alignment for an experiment alignment.
///
/// Walks `derived_from[*]` to the first entry with controls, takes its first
/// control reads file, then scans that control's dataset `original_files`
/// for the first live bam built by `pipeline` from those same reads.
/// Any missing hop means no control.
pub fn find_control_alignment<'a>(
    experiment_file: &'a ResolvedEntity,
    pipeline: &str,
) -> Option<&'a ResolvedEntity> {
    let control_reads = experiment_file
        .many(rel::DERIVED_FROM)
        .iter()
        .find_map(|upstream| upstream.many(rel::CONTROLLED_BY).first())?;
    let control_dataset = control_reads.one(rel::DATASET)?;

    control_dataset
        .many(rel::ORIGINAL_FILES)
        .iter()
        .find(|candidate| {
            !candidate.status.is_retired()
                && candidate.as_file().is_some_and(|f| f.file_format == BAM)
                && StepChain::resolve(candidate).is_ok_and(|chain| chain.has_pipeline(pipeline))
                && candidate
                    .many(rel::DERIVED_FROM)
                    .iter()
                    .any(|upstream| same_record(upstream, control_reads))
        })
}

/// Accession identity when both sides carry one, `@id` otherwise.
fn same_record(a: &Entity, b: &Entity) -> bool {
    match (&a.accession, &b.accession) {
        (Some(x), Some(y)) => x == y,
        _ => a.id == b.id,
    }
}
