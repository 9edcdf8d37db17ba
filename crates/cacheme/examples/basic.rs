//! A single node backed by one in-process tier.

use cacheme::prelude::*;
use std::sync::Arc;

#[derive(Clone)]
struct UserNode {
    id: u64,
}

#[async_trait::async_trait]
impl Node for UserNode {
    type Value = String;

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn version(&self) -> &str {
        "v1"
    }

    fn tiers(&self) -> &[CacheTier] {
        const TIERS: [CacheTier; 1] = [CacheTier::no_ttl("local")];
        &TIERS
    }

    async fn load(&self) -> Result<Self::Value> {
        println!("loading user {}", self.id);
        Ok(format!("user-{}", self.id))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    register_storage("local", Arc::new(MemoryStorage::new()));

    let node = UserNode { id: 42 };
    let first = get(&node).await?;
    let second = get(&node).await?; // served from the tier, `load` not invoked again
    println!("{first} / {second}");

    Ok(())
}
