//! In-memory provenance graph with a reverse-link index.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::ProvenanceGraph;
use crate::errors::GraphError;
use crate::model::{Entity, EntityId};

/// A provenance graph held entirely in memory.
///
/// Entities are immutable once inserted; the reverse index is maintained on
/// insertion so `rev_links` is a single map lookup.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    entities: FxHashMap<EntityId, Arc<Entity>>,
    order: Vec<EntityId>,
    reverse: FxHashMap<EntityId, FxHashMap<&'static str, Vec<EntityId>>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON array of entities.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;
        let mut graph = Self::new();
        for entity in entities {
            graph.insert(entity)?;
        }
        Ok(graph)
    }

    /// Insert an entity. Identifiers must be unique.
    pub fn insert(&mut self, entity: Entity) -> Result<(), GraphError> {
        if self.entities.contains_key(&entity.id) {
            return Err(GraphError::DuplicateEntity(entity.id.to_string()));
        }
        for (name, link) in entity.relations() {
            for target in link.ids() {
                self.reverse
                    .entry(target.clone())
                    .or_default()
                    .entry(name)
                    .or_default()
                    .push(entity.id.clone());
            }
        }
        self.order.push(entity.id.clone());
        self.entities.insert(entity.id.clone(), Arc::new(entity));
        Ok(())
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn require(&self, id: &EntityId) -> Result<Arc<Entity>, GraphError> {
        self.get(id)
            .ok_or_else(|| GraphError::UnknownEntity(id.to_string()))
    }
}

impl ProvenanceGraph for InMemoryGraph {
    fn get(&self, id: &EntityId) -> Option<Arc<Entity>> {
        self.entities.get(id).cloned()
    }

    fn rev_links(&self, target: &EntityId, relation: &str) -> Vec<EntityId> {
        self.reverse
            .get(target)
            .and_then(|by_relation| by_relation.get(relation))
            .cloned()
            .unwrap_or_default()
    }
}
