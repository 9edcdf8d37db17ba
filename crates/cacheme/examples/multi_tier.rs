//! Two tiers: a short-lived local cache backed by a slower shared one.

use cacheme::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct ReportNode {
    id: u32,
}

#[async_trait::async_trait]
impl Node for ReportNode {
    type Value = String;

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn version(&self) -> &str {
        "v1"
    }

    fn tiers(&self) -> &[CacheTier] {
        const TIERS: [CacheTier; 2] = [
            CacheTier::with_ttl("local", Duration::from_secs(10)),
            CacheTier::no_ttl("shared"),
        ];
        &TIERS
    }

    async fn load(&self) -> Result<Self::Value> {
        println!("generating report {}", self.id);
        Ok(format!("report-{}", self.id))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    register_storage("local", Arc::new(MemoryStorage::new()));
    register_storage("shared", Arc::new(MemoryStorage::new()));

    let node = ReportNode { id: 1 };
    get(&node).await?; // miss: loads and writes through both tiers

    invalidate(&node).await?; // drops from both tiers
    let value = get(&node).await?; // misses again, one load
    println!("{value}");

    Ok(())
}
