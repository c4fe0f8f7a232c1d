//! The provenance graph collaborator.
//!
//! The audit engine never performs storage I/O; it reads entities and
//! their relations through [`ProvenanceGraph`] only.

pub mod memory;

use std::sync::Arc;

use crate::model::{Entity, EntityId, Link};

pub use memory::InMemoryGraph;

/// Outcome of following one relation from an entity.
#[derive(Debug, Clone)]
pub enum Related {
    Absent,
    One(Arc<Entity>),
    Many(Vec<Arc<Entity>>),
}

impl Related {
    pub fn is_absent(&self) -> bool {
        matches!(self, Related::Absent)
    }
}

/// Read-only access to entities and their declared relations.
pub trait ProvenanceGraph: Send + Sync {
    /// Look up an entity by identifier.
    fn get(&self, id: &EntityId) -> Option<Arc<Entity>>;

    /// Identifiers of entities whose `relation` points at `target`.
    fn rev_links(&self, target: &EntityId, relation: &str) -> Vec<EntityId>;

    /// Follow `relation` from `entity`. Dangling identifiers are dropped;
    /// a single-valued relation whose target is missing is `Absent`.
    fn get_related(&self, entity: &Entity, relation: &str) -> Related {
        match entity.relation(relation) {
            None => Related::Absent,
            Some(Link::One(id)) => match self.get(id) {
                Some(found) => Related::One(found),
                None => Related::Absent,
            },
            Some(Link::Many(ids)) => {
                Related::Many(ids.iter().filter_map(|id| self.get(id)).collect())
            }
        }
    }
}
