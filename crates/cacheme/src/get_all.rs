//! Bulk read path: one pass per tier across every still-missing node

use std::collections::HashMap;
use std::time::Instant;

use cacheme_core::{CacheTier, Node, Result};

use crate::invalidate::validate_tags;
use crate::prefix::full_key;
use crate::registry::metrics_for;
use crate::storage_registry::storage_by_name;

/// Fetch every node's value, walking tiers breadth-first across the whole
/// batch so a single round trip serves every node still missing at that
/// tier, then issuing one `Node::load_all` call for whatever's left.
///
/// All of `nodes` must share a concrete `Node` type — Rust's type system
/// enforces this at compile time, so there is no runtime class-mismatch
/// check here (see `CacheError::ClassMismatch`, which a heterogeneous
/// `Memoize`-driven caller could still trigger on its own).
pub async fn get_all<N: Node>(nodes: &[N]) -> Result<Vec<N::Value>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let metrics = metrics_for::<N>();
    metrics.inc_request(nodes.len() as u64);

    let full_keys: Vec<String> = nodes.iter().map(full_key).collect();
    let key_index: HashMap<&str, usize> = full_keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.as_str(), i))
        .collect();

    let tiers: Vec<CacheTier> = nodes[0].tiers().to_vec();
    let mut results: Vec<Option<N::Value>> = (0..nodes.len()).map(|_| None).collect();
    let mut missed_before: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut pending: Vec<usize> = (0..nodes.len()).collect();

    for (tier_idx, tier) in tiers.iter().enumerate() {
        if pending.is_empty() {
            break;
        }
        let storage = storage_by_name(tier.storage)?;
        let keys: Vec<String> = pending.iter().map(|&i| full_keys[i].clone()).collect();
        let fetched = storage.get_many(&keys).await?;

        let mut still_pending = Vec::new();
        for (&node_idx, cached_opt) in pending.iter().zip(fetched) {
            let node = &nodes[node_idx];
            let Some(cached) = cached_opt else {
                missed_before[node_idx].push(tier_idx);
                still_pending.push(node_idx);
                continue;
            };

            let value = match node.deserialize(&cached.data) {
                Ok(v) => v,
                Err(_) => {
                    let _ = storage.remove(&full_keys[node_idx]).await;
                    missed_before[node_idx].push(tier_idx);
                    still_pending.push(node_idx);
                    continue;
                }
            };

            let tags = node.tags();
            if !tags.is_empty() && !validate_tags(&tags, cached.updated_at).await {
                let _ = storage.remove(&full_keys[node_idx]).await;
                missed_before[node_idx].push(tier_idx);
                still_pending.push(node_idx);
                continue;
            }

            for &j in &missed_before[node_idx] {
                let earlier_tier = &tiers[j];
                if let Ok(earlier_storage) = storage_by_name(earlier_tier.storage) {
                    let _ = earlier_storage
                        .set(&full_keys[node_idx], cached.data.clone(), earlier_tier.ttl)
                        .await;
                }
            }

            results[node_idx] = Some(value);
        }
        pending = still_pending;
    }

    metrics.inc_hit((nodes.len() - pending.len()) as u64);
    metrics.inc_miss(pending.len() as u64);

    if !pending.is_empty() {
        let pending_nodes: Vec<N> = pending.iter().map(|&i| nodes[i].clone()).collect();
        let start = Instant::now();

        match N::load_all(&pending_nodes).await {
            Err(e) => {
                metrics.record_load_failure(pending.len() as u64, start.elapsed().as_nanos() as u64);
                return Err(e);
            }
            Ok(pairs) => {
                metrics.record_load_success(pairs.len() as u64, start.elapsed().as_nanos() as u64);
                for (loaded_node, value) in &pairs {
                    let key = full_key(loaded_node);
                    let Some(&idx) = key_index.get(key.as_str()) else {
                        continue;
                    };
                    let bytes = loaded_node.serialize(value)?;
                    for tier in &tiers {
                        if let Ok(storage) = storage_by_name(tier.storage) {
                            let _ = storage.set(&key, bytes.clone(), tier.ttl).await;
                        }
                    }
                    results[idx] = Some(value.clone());
                }
            }
        }
    }

    Ok(results
        .into_iter()
        .map(|v| v.expect("every node position is filled by a hit or a load"))
        .collect())
}
