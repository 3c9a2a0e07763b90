pub mod block;

pub use block::BlockCacheManager;

use crate::config::Config;

pub fn init_cache(config: &Config) -> BlockCacheManager {
    BlockCacheManager::new(config.block_cache_capacity, config.block_cache_ttl)
}
