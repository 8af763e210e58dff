//! # Flowsint Enrichers
//!
//! The enricher registry and runtime contract:
//! declares what an enricher looks like, holds the process-wide set of
//! known enrichers, validates a flow node's params against an enricher's
//! declared shape, and resolves `vaultSecret` references before the
//! enricher runs.

mod construct;
mod enricher;
mod metadata;
mod param;
mod registry;

pub use construct::resolve_params;
pub use enricher::{Enricher, EnricherImpl};
pub use metadata::{EnricherMetadata, EnricherMetadataBuilder};
pub use param::{ParamKind, ParamSpec};
pub use registry::EnricherRegistry;

/// Common prelude for crates that drive enrichers.
pub mod prelude {
    pub use super::{Enricher, EnricherImpl, EnricherMetadata, EnricherRegistry, ParamKind, ParamSpec};
}
