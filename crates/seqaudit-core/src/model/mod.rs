//! Provenance record model: identifiers, lifecycle status, typed entity
//! bodies and the relation capability used by frame resolution.

pub mod entity;
pub mod ids;
pub mod metric;
pub mod records;
pub mod relations;
pub mod status;

pub use entity::{Entity, EntityBody, EntityKind, Link};
pub use ids::EntityId;
pub use metric::MetricValue;
pub use records::*;
pub use status::Status;
