//! Process-wide `full_key` prefix

use std::sync::{OnceLock, RwLock};

use cacheme_core::Node;

static PREFIX: OnceLock<RwLock<String>> = OnceLock::new();

fn prefix_lock() -> &'static RwLock<String> {
    PREFIX.get_or_init(|| RwLock::new("cacheme".to_string()))
}

/// Set the prefix used by every `full_key()` computed from now on. Intended
/// to be called once at startup.
pub fn set_prefix(prefix: impl Into<String>) {
    *prefix_lock().write().expect("prefix lock poisoned") = prefix.into();
}

/// Current prefix (default: `"cacheme"`).
pub fn get_prefix() -> String {
    prefix_lock().read().expect("prefix lock poisoned").clone()
}

/// `"{prefix}:{node.key()}:{node.version()}"` — the unique identifier for a
/// node instance within this process.
pub fn full_key<N: Node>(node: &N) -> String {
    format!("{}:{}:{}", get_prefix(), node.key(), node.version())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheme_core::CacheTier as Tier;

    #[derive(Clone)]
    struct TestNode;

    #[async_trait::async_trait]
    impl Node for TestNode {
        type Value = String;

        fn key(&self) -> String {
            "test".to_string()
        }

        fn version(&self) -> &str {
            "v1"
        }

        fn tiers(&self) -> &[Tier] {
            &[]
        }
    }

    #[test]
    fn test_default_and_set_prefix() {
        // isolate from other tests mutating the same process-global prefix
        let _ = prefix_lock().write().map(|mut p| *p = "cacheme".to_string());
        assert_eq!(full_key(&TestNode), "cacheme:test:v1");

        set_prefix("youcache");
        assert_eq!(full_key(&TestNode), "youcache:test:v1");

        set_prefix("cacheme");
    }
}
