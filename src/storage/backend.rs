//! Storage backend implementations.

use super::key::StorageKey;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Failures reported by a storage backend. Passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend '{backend}' failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("stored value at {key} is unreadable: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("storage backend '{0}' is unavailable")]
    Unavailable(&'static str),
}

/// Raw scoped key/value storage supplied by the host.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError>;
    async fn set(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError>;
    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError>;
    fn name(&self) -> &'static str;
}

/// Process-local storage, shared between clones.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<StorageKey, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }
    async fn set(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.clone(), value.to_vec());
        Ok(())
    }
    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
            .is_some())
    }
    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Forgets every write; every read misses.
pub struct NullStorage;
impl NullStorage {
    pub fn new() -> Self {
        Self
    }
}
impl Default for NullStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for NullStorage {
    async fn get(&self, _: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }
    async fn set(&self, _: &StorageKey, _: &[u8]) -> Result<(), StorageError> {
        Ok(())
    }
    async fn delete(&self, _: &StorageKey) -> Result<bool, StorageError> {
        Ok(false)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
