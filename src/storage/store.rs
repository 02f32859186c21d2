//! Typed access to widget records on top of a raw backend.

use super::backend::{StorageBackend, StorageError};
use super::key::StorageKey;
use crate::config::InstanceConfig;
use crate::state::{AggregateState, UserState};
use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Field holding a user's [`UserState`].
pub const USER_STATE_FIELD: &str = "user_state";
/// Field holding an instance's [`AggregateState`].
pub const AGGREGATE_FIELD: &str = "vote_aggregate";
/// Field holding an instance's [`InstanceConfig`].
pub const SETTINGS_FIELD: &str = "settings";

#[derive(Debug, Clone, Default)]
pub struct StoreStats { pub reads: u64, pub misses: u64, pub writes: u64, pub errors: u64 }

struct AtomicStats { reads: AtomicU64, misses: AtomicU64, writes: AtomicU64, errors: AtomicU64 }
impl AtomicStats {
    fn new() -> Self { Self { reads: AtomicU64::new(0), misses: AtomicU64::new(0), writes: AtomicU64::new(0), errors: AtomicU64::new(0) } }
    fn to_stats(&self) -> StoreStats { StoreStats { reads: self.reads.load(Ordering::Relaxed), misses: self.misses.load(Ordering::Relaxed), writes: self.writes.load(Ordering::Relaxed), errors: self.errors.load(Ordering::Relaxed) } }
}

/// Loads and saves widget records as JSON.
///
/// Missing records load as their `Default`, which is how state comes into
/// existence lazily. No retries: backend errors go straight to the caller.
#[derive(Clone)]
pub struct StateStore { backend: Arc<dyn StorageBackend>, stats: Arc<AtomicStats> }

impl StateStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self { Self { backend, stats: Arc::new(AtomicStats::new()) } }

    pub async fn get<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>> {
        match self.backend.get(key).await {
            Ok(Some(data)) => {
                self.stats.reads.fetch_add(1, Ordering::Relaxed);
                serde_json::from_slice(&data).map(Some).map_err(|e| {
                    self.stats.errors.fetch_add(1, Ordering::Relaxed);
                    StorageError::Corrupt { key: key.to_path(), reason: e.to_string() }.into()
                })
            }
            Ok(None) => { self.stats.misses.fetch_add(1, Ordering::Relaxed); Ok(None) }
            Err(e) => { self.stats.errors.fetch_add(1, Ordering::Relaxed); Err(e.into()) }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &StorageKey, value: &T) -> Result<()> {
        let data = serde_json::to_vec(value)?;
        match self.backend.set(key, &data).await {
            Ok(()) => { self.stats.writes.fetch_add(1, Ordering::Relaxed); Ok(()) }
            Err(e) => { self.stats.errors.fetch_add(1, Ordering::Relaxed); Err(e.into()) }
        }
    }

    pub async fn load_user_state(&self, instance_id: &str, user_id: &str) -> Result<UserState> {
        Ok(self.get(&StorageKey::user_state(instance_id, user_id, USER_STATE_FIELD)).await?.unwrap_or_default())
    }

    pub async fn save_user_state(&self, instance_id: &str, user_id: &str, state: &UserState) -> Result<()> {
        self.set(&StorageKey::user_state(instance_id, user_id, USER_STATE_FIELD), state).await
    }

    pub async fn load_aggregate(&self, instance_id: &str) -> Result<AggregateState> {
        Ok(self.get(&StorageKey::summary(instance_id, AGGREGATE_FIELD)).await?.unwrap_or_default())
    }

    pub async fn save_aggregate(&self, instance_id: &str, aggregate: &AggregateState) -> Result<()> {
        self.set(&StorageKey::summary(instance_id, AGGREGATE_FIELD), aggregate).await
    }

    /// Author settings, if any were saved for this instance.
    pub async fn load_config(&self, instance_id: &str) -> Result<Option<InstanceConfig>> {
        self.get(&StorageKey::settings(instance_id, SETTINGS_FIELD)).await
    }

    pub async fn save_config(&self, instance_id: &str, config: &InstanceConfig) -> Result<()> {
        self.set(&StorageKey::settings(instance_id, SETTINGS_FIELD), config).await
    }

    pub fn stats(&self) -> StoreStats { self.stats.to_stats() }
    pub fn backend_name(&self) -> &'static str { self.backend.name() }
}
