//! Frame resolution over cyclic and partially linked graphs.

mod common;

use common::*;
use proptest::prelude::*;

use seqaudit_analysis::frame::{DotPath, Frame};
use seqaudit_core::model::{relations as rel, FileRecord, ReplicateRecord, Entity, EntityBody};

fn self_paired() -> seqaudit_core::graph::InMemoryGraph {
    let mut builder = GraphBuilder::new();
    builder.add(file(
        "/files/SELF/",
        FileRecord {
            paired_end: Some("1".to_string()),
            paired_with: Some("/files/SELF/".into()),
            ..fastq()
        },
    ));
    builder.build()
}

#[test]
fn test_object_frame_embeds_nothing() {
    let graph = self_paired();
    let value = resolve(&graph, "/files/SELF/", &Frame::object());
    assert!(!value.is_embedded(rel::PAIRED_WITH));
    assert_eq!(value.embedded_depth(), 0);
    // The relation is still readable as an identifier.
    assert!(value.as_file().unwrap().paired_with.is_some());
}

#[test]
fn test_missing_link_short_circuits_only_its_path() {
    let mut builder = GraphBuilder::new();
    builder
        .add(Entity::new(
            "/replicates/r1/",
            EntityBody::Replicate(ReplicateRecord {
                biological_replicate_number: 1,
                technical_replicate_number: 1,
                experiment: None,
            }),
        ))
        .add(file(
            "/files/F/",
            FileRecord {
                replicate: Some("/replicates/r1/".into()),
                dataset: Some("/experiments/missing/".into()),
                derived_from: ids(&["/files/gone/", "/replicates/r1/"]),
                ..fastq()
            },
        ));
    let graph = builder.build();
    let frame = Frame::new(&["dataset.target", "replicate.experiment", "derived_from"]);
    let value = resolve(&graph, "/files/F/", &frame);

    assert!(!value.is_embedded(rel::DATASET));
    assert!(value.one(rel::DATASET).is_none());
    let replicate = value.one(rel::REPLICATE).unwrap();
    assert_eq!(replicate.id.as_str(), "/replicates/r1/");
    assert!(replicate.one(rel::EXPERIMENT).is_none());
    // Dangling members of a list are dropped.
    assert_eq!(value.many(rel::DERIVED_FROM).len(), 1);
    assert!(value.many(rel::CONTROLLED_BY).is_empty());
}

#[test]
fn test_overlapping_paths_share_hops() {
    let frame = Frame::new(&["dataset", "dataset.target", "", "dataset..target"]);
    assert_eq!(frame.paths().count(), 2);
    assert_eq!(frame.depth(), 2);
    assert_eq!(DotPath::parse("a..b").to_string(), "a.b");
}

proptest! {
    /// A file paired with itself resolves to exactly the requested depth.
    #[test]
    fn prop_self_cycle_terminates_at_requested_depth(depth in 1usize..12) {
        let graph = self_paired();
        let path = vec![rel::PAIRED_WITH; depth].join(".");
        let frame = Frame::new(&[path.as_str()]);
        let value = resolve(&graph, "/files/SELF/", &frame);
        prop_assert_eq!(value.embedded_depth(), depth);

        let mut node = &value;
        for _ in 0..depth {
            node = node.one(rel::PAIRED_WITH).unwrap();
            prop_assert_eq!(node.id.as_str(), "/files/SELF/");
        }
        prop_assert!(!node.is_embedded(rel::PAIRED_WITH));
    }
}
