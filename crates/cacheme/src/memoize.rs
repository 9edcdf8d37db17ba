//! Binds a load function and a key-extraction function into a cached callable
//!
//! Rust has no descriptor protocol, so a free function and a method need
//! two distinct constructors rather than one that inspects `self`.

use std::future::Future;
use std::pin::Pin;

use cacheme_core::{Node, Result};

use crate::get::get_inner;
use crate::locker::LoadFuture;

/// Wrap a plain async function `load` behind caching keyed by `to_node`.
///
/// ```ignore
/// let cached_fetch = memoize_fn(
///     |id: u64| UserNode { id },
///     |id: u64| async move { fetch_user(id).await },
/// );
/// let user = cached_fetch(42).await?;
/// ```
pub fn memoize_fn<N, A, ToNode, Load, Fut>(
    to_node: ToNode,
    load: Load,
) -> impl Fn(A) -> Pin<Box<dyn Future<Output = Result<N::Value>> + Send>>
where
    N: Node,
    A: Clone + Send + 'static,
    ToNode: Fn(A) -> N + Send + Sync + 'static,
    Load: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<N::Value>> + Send + 'static,
{
    move |args: A| {
        let node = to_node(args.clone());
        let load_fut: LoadFuture<N::Value> = Box::pin(load(args));
        Box::pin(async move { get_inner(&node, Some(load_fut)).await })
    }
}

/// Like `memoize_fn`, but for a method-shaped loader that also takes a
/// receiver (e.g. `&self` on a repository struct) not part of the cache key.
pub fn memoize_method<N, S, A, ToNode, Load, Fut>(
    to_node: ToNode,
    load: Load,
) -> impl Fn(S, A) -> Pin<Box<dyn Future<Output = Result<N::Value>> + Send>>
where
    N: Node,
    S: Clone + Send + 'static,
    A: Clone + Send + 'static,
    ToNode: Fn(&S, A) -> N + Send + Sync + 'static,
    Load: Fn(S, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<N::Value>> + Send + 'static,
{
    move |receiver: S, args: A| {
        let node = to_node(&receiver, args.clone());
        let load_fut: LoadFuture<N::Value> = Box::pin(load(receiver, args));
        Box::pin(async move { get_inner(&node, Some(load_fut)).await })
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
    struct MemoNode {
        id: u32,
    }

    #[async_trait::async_trait]
    impl Node for MemoNode {
        type Value = u32;
        fn key(&self) -> String {
            self.id.to_string()
        }
        fn version(&self) -> &str {
            "v1"
        }
        fn tiers(&self) -> &[Tier] {
            const TIERS: [Tier; 1] = [Tier::no_ttl("memoize_tests")];
            &TIERS
        }
    }

    #[tokio::test]
    async fn test_memoize_fn_caches_across_calls() {
        crate::storage_registry::register_storage("memoize_tests", Arc::new(MemoryStorage::new()));
        let loads = Arc::new(AtomicU32::new(0));

        let loads_clone = loads.clone();
        let cached = memoize_fn(
            |id: u32| MemoNode { id },
            move |id: u32| {
                let loads = loads_clone.clone();
                async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, cacheme_core::CacheError>(id * 1000)
                }
            },
        );

        assert_eq!(cached(3).await.unwrap(), 3000);
        assert_eq!(cached(3).await.unwrap(), 3000);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        assert_eq!(cached(4).await.unwrap(), 4000);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_memoize_concurrent_callers_load_once() {
        crate::storage_registry::register_storage(
            "memoize_tests_concurrent",
            Arc::new(MemoryStorage::new()),
        );

        #[derive(Clone)]
        struct SlowMemoNode {
            id: u32,
        }

        #[async_trait::async_trait]
        impl Node for SlowMemoNode {
            type Value = u32;
            fn key(&self) -> String {
                self.id.to_string()
            }
            fn version(&self) -> &str {
                "v1"
            }
            fn tiers(&self) -> &[Tier] {
                const TIERS: [Tier; 1] = [Tier::no_ttl("memoize_tests_concurrent")];
                &TIERS
            }
        }

        let loads = Arc::new(AtomicU32::new(0));
        let loads_clone = loads.clone();
        let cached = Arc::new(memoize_fn(
            |id: u32| SlowMemoNode { id },
            move |id: u32| {
                let loads = loads_clone.clone();
                async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                    Ok::<u32, cacheme_core::CacheError>(id)
                }
            },
        ));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let cached = cached.clone();
            handles.push(tokio::spawn(async move { cached(1).await.unwrap() }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap(), 1);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
