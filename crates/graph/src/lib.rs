//! # Flowsint Graph
//!
//! Graph persistence and node loading: writes
//! entities and their relationships idempotently, and reads them back out
//! stripped of storage metadata and empty fields for the orchestrator to
//! feed into enrichers.

mod backend;
mod loader;
mod node;

pub use backend::{GraphBackend, InMemoryGraphBackend};
pub use loader::NodeLoader;
pub use node::{GraphEdge, GraphNode};
