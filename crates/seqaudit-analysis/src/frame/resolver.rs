//! Frame resolution: embed linked entities along requested paths.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use seqaudit_core::graph::{ProvenanceGraph, Related};
use seqaudit_core::model::Entity;

use super::{Frame, PathTrie};

/// A linked entity (or list) embedded at one relation hop.
#[derive(Debug, Clone)]
pub enum Embedded {
    One(Box<ResolvedEntity>),
    Many(Vec<ResolvedEntity>),
}

/// An entity snapshot with its requested relations materialized.
///
/// Relations outside the frame stay as plain identifiers on the record.
#[derive(Debug, Clone)]
pub struct ResolvedEntity {
    entity: Arc<Entity>,
    embedded: BTreeMap<String, Embedded>,
}

impl ResolvedEntity {
    /// Wrap an entity with nothing embedded.
    pub fn bare(entity: Arc<Entity>) -> Self {
        Self {
            entity,
            embedded: BTreeMap::new(),
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn shared(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// The embedded single-valued relation, if resolved.
    pub fn one(&self, relation: &str) -> Option<&ResolvedEntity> {
        match self.embedded.get(relation)? {
            Embedded::One(entity) => Some(entity),
            Embedded::Many(entities) => entities.first(),
        }
    }

    /// The embedded multi-valued relation; empty when absent.
    pub fn many(&self, relation: &str) -> &[ResolvedEntity] {
        match self.embedded.get(relation) {
            Some(Embedded::Many(entities)) => entities,
            Some(Embedded::One(entity)) => std::slice::from_ref(entity.as_ref()),
            None => &[],
        }
    }

    pub fn is_embedded(&self, relation: &str) -> bool {
        self.embedded.contains_key(relation)
    }

    /// Number of hops embedded below this node along the deepest branch.
    pub fn embedded_depth(&self) -> usize {
        self.embedded
            .values()
            .map(|embedded| match embedded {
                Embedded::One(entity) => 1 + entity.embedded_depth(),
                Embedded::Many(entities) => {
                    1 + entities
                        .iter()
                        .map(ResolvedEntity::embedded_depth)
                        .max()
                        .unwrap_or(0)
                }
            })
            .max()
            .unwrap_or(0)
    }
}

impl Deref for ResolvedEntity {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

/// Resolves frames against a provenance graph.
///
/// Resolution follows exactly the hops named by the frame, so cyclic
/// relations (a file paired with itself) terminate at the frame's depth.
pub struct FrameResolver<'g> {
    graph: &'g dyn ProvenanceGraph,
}

impl<'g> FrameResolver<'g> {
    pub fn new(graph: &'g dyn ProvenanceGraph) -> Self {
        Self { graph }
    }

    pub fn resolve(&self, entity: Arc<Entity>, frame: &Frame) -> ResolvedEntity {
        if frame.is_object() {
            return ResolvedEntity::bare(entity);
        }
        let trie = frame.trie();
        self.resolve_node(entity, &trie)
    }

    fn resolve_node(&self, entity: Arc<Entity>, trie: &PathTrie) -> ResolvedEntity {
        let mut embedded = BTreeMap::new();
        for (relation, child) in &trie.children {
            match self.graph.get_related(&entity, relation) {
                Related::Absent => {
                    tracing::trace!(entity = %entity.id, relation = %relation, "relation absent");
                }
                Related::One(linked) => {
                    let node = self.resolve_node(linked, child);
                    embedded.insert(relation.clone(), Embedded::One(Box::new(node)));
                }
                Related::Many(linked) => {
                    let nodes = linked
                        .into_iter()
                        .map(|e| self.resolve_node(e, child))
                        .collect();
                    embedded.insert(relation.clone(), Embedded::Many(nodes));
                }
            }
        }
        ResolvedEntity { entity, embedded }
    }
}
