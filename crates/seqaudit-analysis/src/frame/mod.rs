//! Frames: the relation paths a rule needs embedded before it runs.

pub mod resolver;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use smallvec::SmallVec;

pub use resolver::{Embedded, FrameResolver, ResolvedEntity};

/// A dot-separated relation path such as `derived_from.controlled_by.dataset`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DotPath(SmallVec<[String; 4]>);

impl DotPath {
    /// Parse a dotted path. Empty segments are dropped, so `""` is the empty path.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('.')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for DotPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// The set of paths a rule requires. An empty frame means the bare record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    paths: BTreeSet<DotPath>,
}

impl Frame {
    /// The bare record, nothing embedded.
    pub fn object() -> Self {
        Self::default()
    }

    pub fn new(paths: &[&str]) -> Self {
        Self {
            paths: paths
                .iter()
                .map(|p| DotPath::parse(p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &DotPath> {
        self.paths.iter()
    }

    pub fn is_object(&self) -> bool {
        self.paths.is_empty()
    }

    /// Longest path length; resolution never goes deeper than this.
    pub fn depth(&self) -> usize {
        self.paths.iter().map(DotPath::len).max().unwrap_or(0)
    }

    /// Prefix tree of the requested relations.
    pub(crate) fn trie(&self) -> PathTrie {
        let mut root = PathTrie::default();
        for path in &self.paths {
            let mut node = &mut root;
            for segment in path.segments() {
                node = node.children.entry(segment.clone()).or_default();
            }
        }
        root
    }
}

/// Shared-prefix view of a frame, one node per relation hop.
#[derive(Debug, Default)]
pub(crate) struct PathTrie {
    pub(crate) children: BTreeMap<String, PathTrie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_empty_segments() {
        let path = DotPath::parse("derived_from..controlled_by.");
        assert_eq!(path.segments(), ["derived_from", "controlled_by"]);
        assert!(DotPath::parse("").is_empty());
    }

    #[test]
    fn trie_merges_shared_prefixes() {
        let frame = Frame::new(&[
            "derived_from",
            "derived_from.controlled_by",
            "derived_from.replicate.experiment",
        ]);
        assert_eq!(frame.depth(), 3);
        let trie = frame.trie();
        assert_eq!(trie.children.len(), 1);
        let derived = &trie.children["derived_from"];
        assert_eq!(derived.children.len(), 2);
    }
}
