// Configuration for the TPS backfill service:
// - Database connection string (required)
// - Server listening address/port
// - Upstream RPC node list
// - Checkpoint location
// - Throttle, failover and error delays
// - Block cache settings (size, TTL)

use chrono::{DateTime, NaiveDate, Utc};
use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_RPC_NODES: &[&str] = &[
    "https://node.sethforprivacy.com:443",
    "https://node.community.rino.io:443",
    "https://node.monerooutreach.org:443",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Fixed properties of the chain being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    pub launch_date: NaiveDate,
    pub average_block_time_secs: i64,
}

impl ChainParams {
    /// Monero mainnet.
    pub fn monero() -> Self {
        Self {
            launch_date: NaiveDate::from_ymd_opt(2014, 4, 18).unwrap_or_default(),
            average_block_time_secs: 120,
        }
    }

    pub fn launch_time(&self) -> DateTime<Utc> {
        self.launch_date.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub rpc_nodes: Vec<String>,
    pub checkpoint_path: String,
    pub request_throttle: Duration,
    pub node_failover_delay: Duration,
    pub day_error_delay: Duration,
    pub liveness_timeout: Duration,
    pub rpc_timeout_secs: u64,
    pub rpc_rate_limit: Option<u32>,
    pub block_cache_capacity: u64,
    pub block_cache_ttl: Duration,
    pub chain: ChainParams,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = parse_var("SERVER_PORT", 8080)?;

        let rpc_nodes: Vec<String> = match env::var("RPC_NODES") {
            Ok(raw) => raw
                .split(',')
                .map(|node| node.trim().trim_end_matches('/').to_string())
                .filter(|node| !node.is_empty())
                .collect(),
            Err(_) => DEFAULT_RPC_NODES.iter().map(|node| node.to_string()).collect(),
        };
        if rpc_nodes.is_empty() {
            return Err(ConfigError::Invalid {
                var: "RPC_NODES",
                value: env::var("RPC_NODES").unwrap_or_default(),
            });
        }

        let checkpoint_path =
            env::var("CHECKPOINT_PATH").unwrap_or_else(|_| "checkpoint.json".to_string());
        let request_throttle = Duration::from_millis(parse_var("REQUEST_THROTTLE_MS", 2000)?);
        let node_failover_delay =
            Duration::from_millis(parse_var("NODE_FAILOVER_DELAY_MS", 2000)?);
        let day_error_delay = Duration::from_secs(parse_var("DAY_ERROR_DELAY_SECS", 60)?);
        let liveness_timeout = Duration::from_secs(parse_var("LIVENESS_TIMEOUT_SECS", 5)?);
        let rpc_timeout_secs = parse_var("RPC_TIMEOUT_SECS", 30)?;
        let rpc_rate_limit = match env::var("RPC_RATE_LIMIT") {
            Ok(raw) => Some(raw.parse().map_err(|_| ConfigError::Invalid {
                var: "RPC_RATE_LIMIT",
                value: raw,
            })?),
            Err(_) => None,
        };
        let block_cache_capacity = parse_var("BLOCK_CACHE_CAPACITY", 10_000)?;
        let block_cache_ttl = Duration::from_secs(parse_var("BLOCK_CACHE_TTL", 3600)?);

        let defaults = ChainParams::monero();
        let chain = ChainParams {
            launch_date: parse_var("CHAIN_LAUNCH_DATE", defaults.launch_date)?,
            average_block_time_secs: parse_var(
                "AVERAGE_BLOCK_TIME_SECS",
                defaults.average_block_time_secs,
            )?,
        };
        if chain.average_block_time_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "AVERAGE_BLOCK_TIME_SECS",
                value: chain.average_block_time_secs.to_string(),
            });
        }

        Ok(Self {
            database_url,
            server_host,
            server_port,
            rpc_nodes,
            checkpoint_path,
            request_throttle,
            node_failover_delay,
            day_error_delay,
            liveness_timeout,
            rpc_timeout_secs,
            rpc_rate_limit,
            block_cache_capacity,
            block_cache_ttl,
            chain,
        })
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monero_launch_time_is_midnight_utc() {
        let chain = ChainParams::monero();
        assert_eq!(chain.launch_time().timestamp(), 1_397_779_200);
        assert_eq!(chain.average_block_time_secs, 120);
    }

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let value: u64 = parse_var("CHAIN_TPS_SERVICE_UNSET_TEST_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
