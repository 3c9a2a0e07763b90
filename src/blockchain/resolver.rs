use crate::blockchain::client::{ClientError, RpcTransport};
use crate::blockchain::fetcher::BlockFetcher;
use crate::config::ChainParams;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// First guess for the block produced at `target`, assuming a steady block interval.
pub fn estimate_height(chain: &ChainParams, target: DateTime<Utc>) -> u64 {
    let seconds_since_launch = (target - chain.launch_time()).num_seconds();
    (seconds_since_launch / chain.average_block_time_secs).max(0) as u64
}

/// Latest height whose block timestamp is at or before `target`.
///
/// Starts from [`estimate_height`] and walks one block at a time towards the
/// boundary. Never probes above `tip`; if the chain has not reached `target`
/// yet, the tip itself is the answer.
pub async fn height_at_date<T: RpcTransport + ?Sized>(
    fetcher: &mut BlockFetcher<T>,
    chain: &ChainParams,
    tip: u64,
    target: DateTime<Utc>,
) -> Result<u64, ClientError> {
    let target_ts = target.timestamp();
    let mut height = estimate_height(chain, target).min(tip);
    debug!("Estimated height {} for {}", height, target);

    let mut block = fetcher.fetch_block(height).await?;

    if block.timestamp > target_ts {
        while block.timestamp > target_ts && height > 0 {
            height -= 1;
            block = fetcher.fetch_block(height).await?;
        }
    } else if block.timestamp < target_ts {
        while block.timestamp < target_ts {
            if height >= tip {
                info!("Chain tip {} is still before {}", tip, target);
                return Ok(tip);
            }
            height += 1;
            block = fetcher.fetch_block(height).await?;
        }
        // The loop stops on the first block at or past the target.
        height -= 1;
    }

    info!("Found height {} for date {}", height, target);
    Ok(height)
}
