//! The storage contract a cache tier must satisfy

use async_trait::async_trait;
use std::time::Duration;

use crate::{CachedData, Result};

/// A single cache tier's backing store.
///
/// Storages are tier-agnostic and serializer-agnostic: a `Node` serializes
/// its value to bytes before calling `set`, and deserializes the bytes
/// `get` returns. A storage's only job is to remember bytes against a
/// `full_key`, stamp `CachedData::updated_at` on every write, and expire
/// entries per the `ttl` it was given.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Fetch one entry. `Ok(None)` on a miss or on expiry.
    async fn get(&self, full_key: &str) -> Result<Option<CachedData<Vec<u8>>>>;

    /// Fetch several entries, preserving order. A default loop is provided
    /// for storages with no bulk primitive; backends with one should
    /// override it for a single round trip.
    async fn get_many(&self, full_keys: &[String]) -> Result<Vec<Option<CachedData<Vec<u8>>>>> {
        let mut out = Vec::with_capacity(full_keys.len());
        for key in full_keys {
            out.push(self.get(key).await?);
        }
        Ok(out)
    }

    /// Write one entry, stamping `updated_at` to the current time.
    async fn set(&self, full_key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Write several entries sharing one TTL.
    async fn set_many(&self, entries: &[(String, Vec<u8>)], ttl: Option<Duration>) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value.clone(), ttl).await?;
        }
        Ok(())
    }

    /// Remove one entry. A no-op (not an error) if it is absent.
    async fn remove(&self, full_key: &str) -> Result<()>;

    /// Number of live entries, best-effort.
    async fn len(&self) -> Result<usize>;
}
