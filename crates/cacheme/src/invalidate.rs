//! Invalidation: per-node removal, forced refresh, and tag-based group invalidation

use chrono::{DateTime, Utc};

use cacheme_core::{Node, Result};

use crate::get::coordinated_load;
use crate::locker::LoadFuture;
use crate::prefix::full_key;
use crate::registry::metrics_for;
use crate::storage_registry::{storage_by_name, tag_storage};

/// Remove `node`'s cached value from every declared tier.
pub async fn invalidate<N: Node>(node: &N) -> Result<()> {
    let key = full_key(node);
    for tier in node.tiers() {
        storage_by_name(tier.storage)?.remove(&key).await?;
    }
    Ok(())
}

/// Force a fresh load and write-through, bypassing the doorkeeper (a
/// refresh is an explicit write, not an organic admission).
pub async fn refresh<N: Node>(node: &N) -> Result<N::Value> {
    let metrics = metrics_for::<N>();
    let key = full_key(node);
    coordinated_load(node, &key, None::<LoadFuture<N::Value>>, &metrics, true).await
}

/// Invalidate every cached entry tagged `tag`, by stamping the tag's own
/// record with the current time — any entry whose `updated_at` predates
/// this is treated as stale the next time it's read.
pub async fn invalid_tag(tag: &str) -> Result<()> {
    tag_storage().set(tag, Vec::new(), None).await
}

/// `true` if none of `tags` have been invalidated more recently than
/// `data_updated_at`. Storage errors are treated conservatively: any
/// failure to consult the tag store invalidates the entry.
pub(crate) async fn validate_tags(tags: &[String], data_updated_at: DateTime<Utc>) -> bool {
    if tags.is_empty() {
        return true;
    }
    let keys: Vec<String> = tags.to_vec();
    match tag_storage().get_many(&keys).await {
        Ok(records) => !records
            .into_iter()
            .flatten()
            .any(|record| record.updated_at >= data_updated_at),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheme_core::CacheTier as Tier;
    use cacheme_storage::MemoryStorage;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct TaggedNode {
        id: u32,
        loads: Arc<AtomicU32>,
    }

    #[async_trait::async_trait]
    impl Node for TaggedNode {
        type Value = u32;
        fn key(&self) -> String {
            self.id.to_string()
        }
        fn version(&self) -> &str {
            "v1"
        }
        fn tiers(&self) -> &[Tier] {
            const TIERS: [Tier; 1] = [Tier::no_ttl("invalidate_tests")];
            &TIERS
        }
        fn tags(&self) -> Vec<String> {
            vec!["group-a".to_string()]
        }
        async fn load(&self) -> Result<u32> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.id)
        }
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        crate::storage_registry::register_storage("invalidate_tests", Arc::new(MemoryStorage::new()));
        let loads = Arc::new(AtomicU32::new(0));
        let node = TaggedNode { id: 5, loads: loads.clone() };

        crate::get::get(&node).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        invalidate(&node).await.unwrap();
        crate::get::get(&node).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_tag_busts_all_tagged_entries() {
        crate::storage_registry::register_storage("invalidate_tests_tag", Arc::new(MemoryStorage::new()));

        #[derive(Clone)]
        struct TagNode {
            id: u32,
            loads: Arc<AtomicU32>,
        }

        #[async_trait::async_trait]
        impl Node for TagNode {
            type Value = u32;
            fn key(&self) -> String {
                self.id.to_string()
            }
            fn version(&self) -> &str {
                "v1"
            }
            fn tiers(&self) -> &[Tier] {
                const TIERS: [Tier; 1] = [Tier::no_ttl("invalidate_tests_tag")];
                &TIERS
            }
            fn tags(&self) -> Vec<String> {
                vec!["group-b".to_string()]
            }
            async fn load(&self) -> Result<u32> {
                self.loads.fetch_add(1, Ordering::SeqCst);
                Ok(self.id)
            }
        }

        let loads = Arc::new(AtomicU32::new(0));
        let a = TagNode { id: 1, loads: loads.clone() };
        let b = TagNode { id: 2, loads: loads.clone() };

        crate::get::get(&a).await.unwrap();
        crate::get::get(&b).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        invalid_tag("group-b").await.unwrap();

        crate::get::get(&a).await.unwrap();
        crate::get::get(&b).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 4, "both entries reload after their tag is invalidated");
    }

    #[tokio::test]
    async fn test_refresh_bypasses_doorkeeper_and_writes_through() {
        crate::storage_registry::register_storage("invalidate_tests_refresh", Arc::new(MemoryStorage::new()));

        #[derive(Clone)]
        struct GatedNode {
            dk: Arc<cacheme_storage::BloomDoorkeeper>,
        }

        #[async_trait::async_trait]
        impl Node for GatedNode {
            type Value = u32;
            fn key(&self) -> String {
                "gated".to_string()
            }
            fn version(&self) -> &str {
                "v1"
            }
            fn tiers(&self) -> &[Tier] {
                const TIERS: [Tier; 1] = [Tier::no_ttl("invalidate_tests_refresh")];
                &TIERS
            }
            fn doorkeeper(&self) -> Option<&dyn cacheme_core::Doorkeeper> {
                Some(self.dk.as_ref())
            }
            async fn load(&self) -> Result<u32> {
                Ok(1)
            }
        }

        let node = GatedNode {
            dk: Arc::new(cacheme_storage::BloomDoorkeeper::new(100, 0.01)),
        };

        // first sighting through get(): doorkeeper gates the write-through
        crate::get::get(&node).await.unwrap();
        let storage = storage_by_name("invalidate_tests_refresh").unwrap();
        assert!(storage.get(&full_key(&node)).await.unwrap().is_none());

        // refresh() bypasses the gate unconditionally
        refresh(&node).await.unwrap();
        assert!(storage.get(&full_key(&node)).await.unwrap().is_some());
    }
}
