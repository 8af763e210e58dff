use async_trait::async_trait;

/// A source of secret material addressed by an opaque vault id.
///
/// Implemented once per secret backend (an in-memory map for tests, a real
/// vault client in production); the [`crate::SecretStore`] is the thing
/// callers actually use.
#[async_trait]
pub trait SecretBackend: Send + Sync {
    /// Fetch the secret stored under `vault_id`, if any.
    async fn get(&self, vault_id: &str) -> Option<String>;
}

/// An in-memory [`SecretBackend`], for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: dashmap::DashMap<String, String>,
}

impl InMemoryBackend {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a vault entry.
    pub fn insert(&self, vault_id: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(vault_id.into(), value.into());
    }
}

#[async_trait]
impl SecretBackend for InMemoryBackend {
    async fn get(&self, vault_id: &str) -> Option<String> {
        self.entries.get(vault_id).map(|v| v.clone())
    }
}
