//! # Flowsint API
//!
//! HTTP surface for the flow execution engine: enricher and flow listings,
//! launch endpoints wired to the Task Runtime, compile-only flow preview,
//! and Flow CRUD backed by an in-memory store.

mod enrichers;
mod error;
mod flow_routes;
mod flows;
mod routes;
mod schema;
mod state;
mod types;

pub use flows::{FlowInput, FlowRecord, FlowSchema, FlowStore, FlowSummary};
pub use routes::build_router;
pub use schema::RegistryEnricherSchema;
pub use state::AppState;
