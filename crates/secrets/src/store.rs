use std::env;
use std::sync::Arc;

use dashmap::DashMap;
use flowsint_core::UserId;
use flowsint_error::FlowError;
use tracing::debug;

use crate::backend::SecretBackend;

/// What an enricher's `vaultSecret` parameter points at: an opaque vault id
/// and the logical name a user may have registered a per-user override
/// under.
#[derive(Debug, Clone)]
pub struct SecretRef {
    /// Id of the entry in the vault backend, if the secret was provisioned
    /// there rather than per-user.
    pub vault_id: Option<String>,
    /// Stable name used for the per-user override and the environment
    /// variable fallback, e.g. `"pdcp_api_key"`.
    pub logical_name: String,
}

impl SecretRef {
    /// A reference resolved purely by logical name (no vault id).
    pub fn named(logical_name: impl Into<String>) -> Self {
        Self {
            vault_id: None,
            logical_name: logical_name.into(),
        }
    }

    /// A reference that prefers a specific vault entry, falling back to its
    /// logical name.
    pub fn with_vault_id(mut self, vault_id: impl Into<String>) -> Self {
        self.vault_id = Some(vault_id.into());
        self
    }
}

/// Resolves secret references in a fixed order: vault id, then a
/// per-user logical-name override, then an environment variable named
/// after the logical name.
pub struct SecretStore {
    backend: Arc<dyn SecretBackend>,
    user_overrides: DashMap<(UserId, String), String>,
}

impl SecretStore {
    /// Build a store backed by `backend`, with no per-user overrides yet.
    pub fn new(backend: Arc<dyn SecretBackend>) -> Self {
        Self {
            backend,
            user_overrides: DashMap::new(),
        }
    }

    /// Register a per-user override for a logical name, consulted after the
    /// vault id and before the environment.
    pub fn set_user_override(&self, user_id: UserId, logical_name: impl Into<String>, value: impl Into<String>) {
        self.user_overrides
            .insert((user_id, logical_name.into()), value.into());
    }

    /// Resolve `secret_ref` for `user_id`, trying the vault id, then the
    /// user's override, then an environment variable named exactly after the
    /// logical name (not uppercased), in that order. A secret that is
    /// resolvable nowhere is a [`FlowError::config`] naming the logical
    /// name, so the caller can report exactly which secret is missing.
    pub async fn resolve(&self, user_id: UserId, secret_ref: &SecretRef) -> Result<String, FlowError> {
        if let Some(vault_id) = &secret_ref.vault_id {
            if let Some(value) = self.backend.get(vault_id).await {
                debug!(vault_id, "resolved secret from vault");
                return Ok(value);
            }
        }

        if let Some(value) = self
            .user_overrides
            .get(&(user_id, secret_ref.logical_name.clone()))
        {
            debug!(logical_name = %secret_ref.logical_name, "resolved secret from user override");
            return Ok(value.clone());
        }

        if let Ok(value) = env::var(&secret_ref.logical_name) {
            debug!(logical_name = %secret_ref.logical_name, "resolved secret from environment");
            return Ok(value);
        }

        Err(FlowError::config(format!(
            "missing required secret '{}'",
            secret_ref.logical_name
        )))
    }
}
