//! Node-class registry: lazily-created per-class `Metrics`

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use cacheme_core::{Metrics, Node};
use dashmap::DashMap;

struct ClassEntry {
    type_name: &'static str,
    internal: bool,
    metrics: Arc<Metrics>,
}

static REGISTRY: OnceLock<DashMap<TypeId, ClassEntry>> = OnceLock::new();

fn registry() -> &'static DashMap<TypeId, ClassEntry> {
    REGISTRY.get_or_init(DashMap::new)
}

/// The `Metrics` for `N`, created the first time any node of this class is
/// touched by `get`/`get_all`/`refresh`/`stats`.
pub fn metrics_for<N: Node>() -> Arc<Metrics> {
    registry()
        .entry(TypeId::of::<N>())
        .or_insert_with(|| ClassEntry {
            type_name: std::any::type_name::<N>(),
            internal: N::INTERNAL,
            metrics: Arc::new(Metrics::new()),
        })
        .metrics
        .clone()
}

/// Names of every non-internal node class touched so far this process.
pub fn nodes() -> Vec<&'static str> {
    registry()
        .iter()
        .filter(|e| !e.internal)
        .map(|e| e.type_name)
        .collect()
}

/// Counters for one node class, registering it if this is the first time
/// it's been named.
pub fn stats<N: Node>() -> Arc<Metrics> {
    metrics_for::<N>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheme_core::CacheTier as Tier;

    #[derive(Clone)]
    struct VisibleNode;

    #[async_trait::async_trait]
    impl Node for VisibleNode {
        type Value = u32;
        fn key(&self) -> String {
            "v".to_string()
        }
        fn version(&self) -> &str {
            "v1"
        }
        fn tiers(&self) -> &[Tier] {
            &[]
        }
    }

    #[derive(Clone)]
    struct HiddenNode;

    #[async_trait::async_trait]
    impl Node for HiddenNode {
        type Value = u32;
        const INTERNAL: bool = true;
        fn key(&self) -> String {
            "h".to_string()
        }
        fn version(&self) -> &str {
            "v1"
        }
        fn tiers(&self) -> &[Tier] {
            &[]
        }
    }

    #[test]
    fn test_internal_excluded_from_nodes() {
        let _ = metrics_for::<VisibleNode>();
        let _ = metrics_for::<HiddenNode>();
        let names = nodes();
        assert!(names.iter().any(|n| n.contains("VisibleNode")));
        assert!(!names.iter().any(|n| n.contains("HiddenNode")));
    }

    #[test]
    fn test_metrics_for_is_stable() {
        let a = metrics_for::<VisibleNode>();
        a.inc_request(1);
        let b = metrics_for::<VisibleNode>();
        assert_eq!(b.request_count(), 1);
    }
}
