//! Integration-style tests run against an in-memory chain and SQLite.


mod checkpoint_tests;
mod db_tests;
mod resolver_tests;

use crate::blockchain::fetcher::{BlockFetcher, FetchPolicy, NodeRotation};
use crate::cache::BlockCacheManager;
use crate::config::ChainParams;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mock_chain::MockChain;
use std::sync::Arc;
use std::time::Duration;

pub const NODES: [&str; 3] = ["http://node-a:18081", "http://node-b:18081", "http://node-c:18081"];

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at_midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Monero launch timestamp.
pub fn launch_ts() -> i64 {
    ChainParams::monero().launch_time().timestamp()
}

/// Same launch date as Monero but one block an hour, so a day is 24 blocks.
pub fn hourly_chain_params() -> ChainParams {
    ChainParams {
        launch_date: date(2014, 4, 18),
        average_block_time_secs: 3600,
    }
}

pub fn no_delay_policy() -> FetchPolicy {
    FetchPolicy {
        throttle: Duration::ZERO,
        failover_delay: Duration::ZERO,
        rate_limit: None,
    }
}

pub fn test_fetcher(chain: Arc<MockChain>, policy: FetchPolicy) -> BlockFetcher<MockChain> {
    BlockFetcher::new(
        chain,
        NodeRotation::new(NODES.iter().map(|n| n.to_string()).collect()),
        BlockCacheManager::new(10_000, Duration::from_secs(3600)),
        policy,
    )
}
