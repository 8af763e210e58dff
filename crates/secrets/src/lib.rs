//! # Flowsint Secrets
//!
//! Secret resolution for enricher credentials: resolves
//! a `vaultSecret` parameter to a plaintext value at enricher construction
//! time, trying a vault id, then a per-user override, then the environment.

mod backend;
mod store;

pub use backend::{InMemoryBackend, SecretBackend};
pub use store::{SecretRef, SecretStore};
