//! The `Node` trait: a schema object identifying a cacheable computation

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, CacheTier, Doorkeeper, JsonSerializer, Result, Serializer};

/// A cacheable unit of work.
///
/// A node's instance fields form its cache key; its class (the concrete
/// Rust type) carries the shared metadata: version, tier list, tags,
/// optional doorkeeper, and serializer. `load` produces the value on a
/// cache miss.
///
/// Implementors only need to provide `key`, `version`, `tiers`, and (unless
/// they're only ever driven through Memoize or `get`'s `override`
/// parameter) `load`. Everything else has a sensible default.
#[async_trait]
pub trait Node: Clone + Send + Sync + Sized + 'static {
    /// The value this node's `load` produces.
    type Value: Clone + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Set this to `true` for internal bookkeeping node types (e.g. a tag
    /// store's own record type) that should not appear in `nodes()` or be
    /// enumerable via `stats`.
    const INTERNAL: bool = false;

    /// The instance-specific part of the cache key.
    fn key(&self) -> String;

    /// Part of `full_key`; bump to invalidate every existing entry for a
    /// node class at once (e.g. after changing its value's shape).
    fn version(&self) -> &str;

    /// Declared cache tiers, fastest first.
    fn tiers(&self) -> &[CacheTier];

    /// Tags this instance's cached value should be invalidated by. Default:
    /// none. May depend on instance fields.
    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    /// Optional admission-gate doorkeeper shared by this node class.
    fn doorkeeper(&self) -> Option<&dyn Doorkeeper> {
        None
    }

    /// Encode a value for storage. Default: JSON. Override to plug in a
    /// different `Serializer`.
    fn serialize(&self, value: &Self::Value) -> Result<Vec<u8>> {
        JsonSerializer.encode(value)
    }

    /// Decode a value read back from storage.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Value> {
        JsonSerializer.decode(bytes)
    }

    /// Produce the value for a cache miss. The default raises
    /// `NotImplemented`; either override this for types with a fixed
    /// loader, or drive the node through `Memoize`/`get`'s explicit
    /// override, which never calls this default.
    async fn load(&self) -> Result<Self::Value> {
        Err(CacheError::NotImplemented(
            std::any::type_name::<Self>().to_string(),
        ))
    }

    /// Batched load for `get_all`. Default: call `load` once per node.
    /// Override when the backing source has a genuine bulk API.
    async fn load_all(nodes: &[Self]) -> Result<Vec<(Self, Self::Value)>> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            let value = node.load().await?;
            out.push((node.clone(), value));
        }
        Ok(out)
    }
}
