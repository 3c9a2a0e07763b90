use crate::backfill::BackfillError;
use crate::blockchain::client::RpcTransport;
use crate::blockchain::fetcher::BlockFetcher;
use crate::checkpoint::CheckpointStore;
use crate::models::Checkpoint;
use chrono::NaiveDate;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyOutcome {
    pub total_transactions: u64,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
}

/// Transactions per second over `[start_timestamp, end_timestamp]`.
///
/// An empty or inverted span yields zero. A non-finite result is an error so
/// the day is skipped instead of stored.
pub fn compute_tps(date: NaiveDate, outcome: &TallyOutcome) -> Result<f64, BackfillError> {
    let span = outcome.end_timestamp - outcome.start_timestamp;
    let tps = if span > 0 {
        outcome.total_transactions as f64 / span as f64
    } else {
        0.0
    };

    if !tps.is_finite() {
        return Err(BackfillError::InvalidTps { date, tps });
    }
    Ok(tps)
}

/// Sum transactions over `[start_height, end_height]`, checkpointing after
/// every block.
///
/// With `resume`, counting continues at `resume.current_height + 1` and starts
/// from `resume.total_transactions`.
pub async fn tally<T: RpcTransport + ?Sized>(
    fetcher: &mut BlockFetcher<T>,
    checkpoints: &dyn CheckpointStore,
    date: NaiveDate,
    start_height: u64,
    end_height: u64,
    resume: Option<&Checkpoint>,
) -> Result<TallyOutcome, BackfillError> {
    let (first_height, mut total_transactions, mut start_timestamp) = match resume {
        Some(checkpoint) => (
            checkpoint.current_height + 1,
            checkpoint.total_transactions,
            checkpoint.start_timestamp,
        ),
        None => (start_height, 0, None),
    };
    let mut end_timestamp = None;

    for height in first_height..=end_height {
        let block = fetcher.fetch_block(height).await?;
        if height == start_height {
            start_timestamp = Some(block.timestamp);
        }
        if height == end_height {
            end_timestamp = Some(block.timestamp);
        }
        total_transactions += block.transaction_count();

        let checkpoint = Checkpoint {
            date,
            current_height: height,
            total_transactions,
            start_height: Some(start_height),
            start_timestamp,
        };
        if let Err(e) = checkpoints.save(&checkpoint).await {
            warn!("Failed to save checkpoint for {} at height {}: {}", date, height, e);
        }
    }

    // A resumed range may never touch its boundaries again.
    let start_timestamp = match start_timestamp {
        Some(ts) => ts,
        None => fetcher.fetch_block(start_height).await?.timestamp,
    };
    let end_timestamp = match end_timestamp {
        Some(ts) => ts,
        None => fetcher.fetch_block(end_height).await?.timestamp,
    };

    debug!(
        "Tallied {} transactions for {} over heights {}-{}",
        total_transactions, date, start_height, end_height
    );

    Ok(TallyOutcome {
        total_transactions,
        start_timestamp,
        end_timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()
    }

    #[test]
    fn tps_divides_by_elapsed_seconds() {
        let outcome = TallyOutcome {
            total_transactions: 8640,
            start_timestamp: 1_000,
            end_timestamp: 87_400,
        };
        assert!((compute_tps(day(), &outcome).unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zero_span_gives_zero_tps() {
        let outcome = TallyOutcome {
            total_transactions: 12,
            start_timestamp: 5_000,
            end_timestamp: 5_000,
        };
        assert_eq!(compute_tps(day(), &outcome).unwrap(), 0.0);
    }

    #[test]
    fn inverted_span_gives_zero_tps() {
        let outcome = TallyOutcome {
            total_transactions: 12,
            start_timestamp: 5_000,
            end_timestamp: 4_000,
        };
        assert_eq!(compute_tps(day(), &outcome).unwrap(), 0.0);
    }
}
