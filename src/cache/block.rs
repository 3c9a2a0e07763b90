//! Block cache implementation using Moka

use crate::blockchain::models::Block;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// Blocks already fetched during a run, keyed by height.
#[derive(Clone)]
pub struct BlockCacheManager {
    cache: Cache<u64, Block>,
}

impl BlockCacheManager {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, height: u64) -> Option<Block> {
        let result = self.cache.get(&height).await;
        if result.is_some() {
            debug!("Block cache hit for height {}", height);
        }
        result
    }

    pub async fn insert(&self, block: Block) {
        self.cache.insert(block.height, block).await;
    }
}
