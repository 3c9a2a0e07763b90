use crate::blockchain::client::{ClientError, RpcTransport};
use crate::blockchain::models::{parse_block, parse_chain_height, Block};
use crate::cache::BlockCacheManager;
use crate::config::Config;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Which node the fetcher talks to next. Advances on failure and wraps around.
#[derive(Debug, Clone)]
pub struct NodeRotation {
    nodes: Vec<String>,
    index: usize,
}

impl NodeRotation {
    pub fn new(nodes: Vec<String>) -> Self {
        Self { nodes, index: 0 }
    }

    pub fn current(&self) -> &str {
        &self.nodes[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn advance(&mut self) {
        if !self.nodes.is_empty() {
            self.index = (self.index + 1) % self.nodes.len();
        }
    }

    pub fn start_at(&mut self, index: usize) {
        if !self.nodes.is_empty() {
            self.index = index % self.nodes.len();
        }
    }
}

/// Delays applied around network fetches.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Slept before every network fetch.
    pub throttle: Duration,
    /// Slept after a node fails, before moving to the next one.
    pub failover_delay: Duration,
    pub rate_limit: Option<NonZeroU32>,
}

impl FetchPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            throttle: config.request_throttle,
            failover_delay: config.node_failover_delay,
            rate_limit: config.rpc_rate_limit.and_then(NonZeroU32::new),
        }
    }
}

/// Session object for block retrieval: owns the rotation state, the block
/// cache and the pacing for one backfill run.
pub struct BlockFetcher<T: ?Sized> {
    transport: Arc<T>,
    rotation: NodeRotation,
    cache: BlockCacheManager,
    policy: FetchPolicy,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl<T: RpcTransport + ?Sized> BlockFetcher<T> {
    pub fn new(
        transport: Arc<T>,
        rotation: NodeRotation,
        cache: BlockCacheManager,
        policy: FetchPolicy,
    ) -> Self {
        let limiter = policy
            .rate_limit
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Self {
            transport,
            rotation,
            cache,
            policy,
            limiter,
        }
    }

    pub fn rotation(&self) -> &NodeRotation {
        &self.rotation
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn start_at(&mut self, index: usize) {
        self.rotation.start_at(index);
    }

    /// Height of the newest block on the chain.
    pub async fn fetch_chain_height(&mut self) -> Result<u64, ClientError> {
        self.fetch("get_block_count", json!({}), parse_chain_height)
            .await
    }

    pub async fn fetch_block(&mut self, height: u64) -> Result<Block, ClientError> {
        if let Some(block) = self.cache.get(height).await {
            return Ok(block);
        }

        let block = self
            .fetch("get_block", json!({ "height": height }), |result| {
                parse_block(height, result)
            })
            .await?;

        self.cache.insert(block.clone()).await;
        Ok(block)
    }

    /// Throttle, then try each node in rotation order until one answers with
    /// something `parse` accepts.
    async fn fetch<R>(
        &mut self,
        method: &str,
        params: Value,
        parse: impl Fn(Value) -> Result<R, ClientError>,
    ) -> Result<R, ClientError> {
        sleep(self.policy.throttle).await;

        let total_nodes = self.rotation.len();
        if total_nodes == 0 {
            return Err(ClientError::NoAvailableNode(0));
        }

        for attempt in 1..=total_nodes {
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let node = self.rotation.current().to_string();
            debug!("Calling {} {} on {}", method, params, node);

            let outcome = match self.transport.call(&node, method, params.clone(), None).await {
                Ok(result) => parse(result),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) => {
                    error!("Error with node {} during {} {}: {}", node, method, params, e);
                    self.rotation.advance();
                    if attempt < total_nodes {
                        info!("Failing over to node {}", self.rotation.current());
                        sleep(self.policy.failover_delay).await;
                    }
                }
            }
        }

        Err(ClientError::AllNodesFailed {
            attempts: total_nodes,
        })
    }
}
