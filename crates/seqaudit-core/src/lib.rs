//! Core types for the seqaudit compliance engine: the provenance record
//! model, the read-only graph capability, subsystem errors, layered
//! configuration and tracing setup.

pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod model;

pub use graph::{InMemoryGraph, ProvenanceGraph, Related};
pub use model::{Entity, EntityBody, EntityId, EntityKind, Link, Status};
