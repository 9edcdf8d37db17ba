//! Grouping nodes under a tag and invalidating the whole group at once.

use cacheme::prelude::*;
use std::sync::Arc;

#[derive(Clone)]
struct PostNode {
    id: u32,
    author: String,
}

#[async_trait::async_trait]
impl Node for PostNode {
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

    fn tags(&self) -> Vec<String> {
        vec![format!("author:{}", self.author)]
    }

    async fn load(&self) -> Result<Self::Value> {
        println!("loading post {}", self.id);
        Ok(format!("post-{}-by-{}", self.id, self.author))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    register_storage("local", Arc::new(MemoryStorage::new()));

    let post1 = PostNode { id: 1, author: "ada".to_string() };
    let post2 = PostNode { id: 2, author: "ada".to_string() };

    get(&post1).await?;
    get(&post2).await?;

    // ada edits her profile; every cached post of hers goes stale at once.
    invalid_tag("author:ada").await?;

    get(&post1).await?; // reloads
    get(&post2).await?; // reloads

    Ok(())
}
