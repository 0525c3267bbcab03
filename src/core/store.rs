//! Document store used by the handlers.
//!
//! Documents are JSON values kept under string keys. The [`Backend`] trait is
//! the raw byte-level contract; [`Store`] layers typed JSON access and key
//! assignment on top of it.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub trait Backend: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()>;
    /// Remove `key`, reporting whether anything was stored under it.
    fn delete(&self, key: &str) -> anyhow::Result<bool>;
}

/// Process-local backend. Every operation takes the lock once, so single
/// reads and writes are atomic but sequences of them are not.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }
}

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
}

impl Store {
    pub fn open_in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::default()))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Generate a fresh document key.
    pub fn assign_key(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self.backend.get(key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("corrupt document at {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.backend
            .set(key, &bytes)
            .with_context(|| format!("failed to write {}", key))
    }

    /// `Ok(false)` when the key was already gone.
    pub fn delete(&self, key: &str) -> anyhow::Result<bool> {
        self.backend
            .delete(key)
            .with_context(|| format!("failed to delete {}", key))
    }
}
