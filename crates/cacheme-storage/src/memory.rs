//! In-process cache tier backed by a `DashMap`

use async_trait::async_trait;
use cacheme_core::{CachedData, Result, Storage};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::expiry::ExpiryWheel;

/// Configuration for `MemoryStorage`.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// How finely expirations are coalesced; two keys scheduled within the
    /// same window are reaped on the same sweep.
    pub expiry_resolution: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            expiry_resolution: Duration::from_secs(1),
        }
    }
}

/// A `Storage` living entirely in process memory.
///
/// Cloning creates a new handle onto the same underlying map — cheap, and
/// the idiom used to hand the same tier to multiple registrations (e.g.
/// sharing one instance as both a node's `local` tier and the process-wide
/// tag store).
#[derive(Clone)]
pub struct MemoryStorage {
    data: Arc<DashMap<String, CachedData<Vec<u8>>>>,
    expiry: Arc<RwLock<ExpiryWheel>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_config(MemoryConfig::default())
    }

    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            expiry: Arc::new(RwLock::new(ExpiryWheel::new(config.expiry_resolution))),
        }
    }

    /// Evict entries whose expiry tick has passed. Called opportunistically
    /// on read/write; a production deployment would also sweep this from a
    /// background task.
    fn reap_expired(&self) {
        let expired = self.expiry.write().sweep();
        for key in expired {
            self.data.remove(&key);
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, full_key: &str) -> Result<Option<CachedData<Vec<u8>>>> {
        self.reap_expired();
        Ok(self.data.get(full_key).map(|e| e.clone()))
    }

    async fn set(&self, full_key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.expiry.write().remove(full_key);
        if let Some(ttl) = ttl {
            self.expiry.write().schedule(full_key.to_string(), ttl);
        }
        self.data.insert(
            full_key.to_string(),
            CachedData {
                data: value,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, full_key: &str) -> Result<()> {
        self.data.remove(full_key);
        self.expiry.write().remove(full_key);
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }
}
