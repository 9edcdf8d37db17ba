//! Caching a plain async function without writing a `Node` impl by hand.

use cacheme::prelude::*;
use std::sync::Arc;

#[derive(Clone)]
struct PriceNode {
    symbol: String,
}

#[async_trait::async_trait]
impl Node for PriceNode {
    type Value = f64;

    fn key(&self) -> String {
        self.symbol.clone()
    }

    fn version(&self) -> &str {
        "v1"
    }

    fn tiers(&self) -> &[CacheTier] {
        const TIERS: [CacheTier; 1] = [CacheTier::with_ttl("local", std::time::Duration::from_secs(5))];
        &TIERS
    }
}

async fn fetch_price(symbol: String) -> Result<f64> {
    println!("fetching live price for {symbol}");
    Ok(if symbol == "ACME" { 123.45 } else { 0.0 })
}

#[tokio::main]
async fn main() -> Result<()> {
    register_storage("local", Arc::new(MemoryStorage::new()));

    let price = memoize_fn(
        |symbol: String| PriceNode { symbol },
        fetch_price,
    );

    let a = price("ACME".to_string()).await?;
    let b = price("ACME".to_string()).await?; // coalesced, no second fetch
    println!("{a} / {b}");

    Ok(())
}
