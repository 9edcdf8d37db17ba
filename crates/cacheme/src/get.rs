//! The single-node read path: tiered lookup, tag validation, coordinated load

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use cacheme_core::{Metrics, Node, Result};
use tracing::{debug, warn};

use crate::invalidate::validate_tags;
use crate::locker::{locker_for, remove_locker, LoadFuture};
use crate::prefix::full_key;
use crate::registry::metrics_for;
use crate::storage_registry::storage_by_name;

/// Fetch `node`'s value, walking its declared tiers fastest-first, falling
/// through to a coordinated load on a full miss or a stale/invalid tag.
pub async fn get<N: Node>(node: &N) -> Result<N::Value> {
    get_inner(node, None).await
}

pub(crate) async fn get_inner<N: Node>(
    node: &N,
    override_fut: Option<LoadFuture<N::Value>>,
) -> Result<N::Value> {
    let metrics = metrics_for::<N>();
    metrics.inc_request(1);
    let key = full_key(node);
    let tiers = node.tiers();
    let tags = node.tags();

    let mut missed_tiers: Vec<usize> = Vec::new();

    for (i, tier) in tiers.iter().enumerate() {
        let storage = storage_by_name(tier.storage)?;
        let Some(cached) = storage.get(&key).await? else {
            missed_tiers.push(i);
            continue;
        };

        let value = match node.deserialize(&cached.data) {
            Ok(v) => v,
            Err(e) => {
                warn!(target: "cacheme", full_key = %key, tier = tier.storage, error = %e, "dropping undeserializable entry");
                let _ = storage.remove(&key).await;
                missed_tiers.push(i);
                continue;
            }
        };

        if !tags.is_empty() && !validate_tags(&tags, cached.updated_at).await {
            debug!(target: "cacheme", full_key = %key, "entry invalidated by tag");
            let _ = storage.remove(&key).await;
            missed_tiers.push(i);
            continue;
        }

        metrics.inc_hit(1);
        backfill(node, &key, &missed_tiers, &cached.data).await;
        return Ok(value);
    }

    metrics.inc_miss(1);
    coordinated_load(node, &key, override_fut, &metrics, false).await
}

async fn backfill<N: Node>(node: &N, full_key: &str, missed_tiers: &[usize], raw: &[u8]) {
    for &i in missed_tiers {
        let tier = &node.tiers()[i];
        if let Ok(storage) = storage_by_name(tier.storage) {
            let _ = storage.set(full_key, raw.to_vec(), tier.ttl).await;
        }
    }
}

/// Run (or join) the single in-flight load for `full_key`, writing the
/// result through every declared tier unless the doorkeeper gates it.
///
/// `bypass_doorkeeper` is set by `refresh()`, whose whole point is an
/// unconditional write.
pub(crate) async fn coordinated_load<N: Node>(
    node: &N,
    full_key: &str,
    override_fut: Option<LoadFuture<N::Value>>,
    metrics: &Metrics,
    bypass_doorkeeper: bool,
) -> Result<N::Value> {
    let locker = locker_for(full_key);
    let _guard = locker.mutex.lock().await;

    if let Some(existing) = locker.slot.lock().as_ref() {
        if let Some(v) = existing.downcast_ref::<N::Value>() {
            return Ok(v.clone());
        }
    }

    let start = Instant::now();
    let load_result = match override_fut {
        Some(fut) => fut.await,
        None => node.load().await,
    };

    let outcome = match load_result {
        Err(e) => {
            metrics.record_load_failure(1, start.elapsed().as_nanos() as u64);
            Err(e)
        }
        Ok(value) => {
            metrics.record_load_success(1, start.elapsed().as_nanos() as u64);
            *locker.slot.lock() = Some(Arc::new(value.clone()) as Arc<dyn Any + Send + Sync>);

            let write_result = write_through(node, full_key, &value, bypass_doorkeeper).await;
            write_result.map(|_| value)
        }
    };

    remove_locker(full_key);
    outcome
}

async fn write_through<N: Node>(
    node: &N,
    full_key: &str,
    value: &N::Value,
    bypass_doorkeeper: bool,
) -> Result<()> {
    let gated = if bypass_doorkeeper {
        false
    } else if let Some(dk) = node.doorkeeper() {
        if dk.contains(full_key) {
            false
        } else {
            dk.put(full_key);
            true
        }
    } else {
        false
    };

    if gated {
        debug!(target: "cacheme", full_key, "doorkeeper gated a one-hit wonder, not writing through");
        return Ok(());
    }

    let bytes = node.serialize(value)?;
    for tier in node.tiers() {
        let storage = storage_by_name(tier.storage)?;
        storage.set(full_key, bytes.clone(), tier.ttl).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheme_core::CacheTier as Tier;
    use cacheme_storage::MemoryStorage;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Clone)]
    struct CountingNode {
        id: u32,
        loads: Arc<AtomicU32>,
    }

    #[async_trait::async_trait]
    impl Node for CountingNode {
        type Value = u32;

        fn key(&self) -> String {
            self.id.to_string()
        }

        fn version(&self) -> &str {
            "v1"
        }

        fn tiers(&self) -> &[Tier] {
            const TIERS: [Tier; 1] = [Tier::no_ttl("get_tests")];
            &TIERS
        }

        async fn load(&self) -> Result<u32> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.id * 10)
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        crate::storage_registry::register_storage("get_tests", Arc::new(MemoryStorage::new()));
        let loads = Arc::new(AtomicU32::new(0));
        let node = CountingNode { id: 7, loads: loads.clone() };

        let v1 = get(&node).await.unwrap();
        assert_eq!(v1, 70);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        let v2 = get(&node).await.unwrap();
        assert_eq!(v2, 70);
        assert_eq!(loads.load(Ordering::SeqCst), 1, "second call should hit storage, not reload");
    }

    #[tokio::test]
    async fn test_concurrent_misses_load_once() {
        crate::storage_registry::register_storage("get_tests_concurrent", Arc::new(MemoryStorage::new()));
        let loads = Arc::new(AtomicU32::new(0));

        #[derive(Clone)]
        struct SlowNode {
            loads: Arc<AtomicU32>,
        }

        #[async_trait::async_trait]
        impl Node for SlowNode {
            type Value = u32;
            fn key(&self) -> String {
                "slow".to_string()
            }
            fn version(&self) -> &str {
                "v1"
            }
            fn tiers(&self) -> &[Tier] {
                const TIERS: [Tier; 1] = [Tier::no_ttl("get_tests_concurrent")];
                &TIERS
            }
            async fn load(&self) -> Result<u32> {
                self.loads.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok(99)
            }
        }

        let node = SlowNode { loads: loads.clone() };
        let mut handles = Vec::new();
        for _ in 0..20 {
            let node = node.clone();
            handles.push(tokio::spawn(async move { get(&node).await.unwrap() }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap(), 99);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
