use crate::backfill::accumulator::{compute_tps, tally};
use crate::backfill::{BackfillError, BackfillSettings};
use crate::blockchain::client::RpcTransport;
use crate::blockchain::fetcher::BlockFetcher;
use crate::blockchain::node_selector::select_working_node;
use crate::blockchain::resolver::height_at_date;
use crate::checkpoint::CheckpointStore;
use crate::db::daily_tps;
use crate::models::{Checkpoint, NewDailyTps};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackfillSummary {
    pub days_stored: u32,
    /// Days with no blocks between their boundaries.
    pub days_empty: u32,
    /// Days whose TPS came out non-finite.
    pub days_invalid: u32,
    /// Days abandoned after an error.
    pub days_failed: u32,
}

enum DayOutcome {
    Stored,
    Empty,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub struct BackfillDriver<T: ?Sized> {
    fetcher: BlockFetcher<T>,
    checkpoints: Arc<dyn CheckpointStore>,
    pool: SqlitePool,
    settings: BackfillSettings,
}

impl<T: RpcTransport + ?Sized> BackfillDriver<T> {
    pub fn new(
        fetcher: BlockFetcher<T>,
        checkpoints: Arc<dyn CheckpointStore>,
        pool: SqlitePool,
        settings: BackfillSettings,
    ) -> Self {
        Self {
            fetcher,
            checkpoints,
            pool,
            settings,
        }
    }

    pub fn fetcher(&self) -> &BlockFetcher<T> {
        &self.fetcher
    }

    /// Process every day from where the last run stopped up to and including
    /// the day containing `now`.
    ///
    /// Only startup failures (no reachable node, unknown chain tip, unreadable
    /// record table) end the run early. A failing day is logged, followed by a
    /// pause, and then left behind.
    pub async fn run(&mut self, now: DateTime<Utc>) -> Result<BackfillSummary, BackfillError> {
        info!("Starting historical TPS calculation");

        let selected = select_working_node(
            self.fetcher.transport(),
            self.fetcher.rotation().nodes(),
            self.settings.liveness_timeout,
        )
        .await?;
        self.fetcher.start_at(selected);

        let tip = match self.fetcher.fetch_chain_height().await {
            Ok(tip) => tip,
            Err(e) => {
                warn!(
                    "Could not read the chain tip after selecting node {}: {}",
                    self.fetcher.rotation().nodes()[selected],
                    e
                );
                return Err(e.into());
            }
        };
        info!("Chain tip is at height {}", tip);

        let (mut current, mut checkpoint) = self.initial_state().await?;
        let today = now.date_naive();
        let mut summary = BackfillSummary::default();

        while current <= today {
            info!("Calculating TPS for {}", current);

            let resume = checkpoint.take().filter(|cp| cp.date == current);
            match self.process_day(current, tip, resume).await {
                Ok(DayOutcome::Stored) => summary.days_stored += 1,
                Ok(DayOutcome::Empty) => summary.days_empty += 1,
                Err(BackfillError::InvalidTps { date, tps }) => {
                    warn!("Invalid TPS {} calculated for {}, skipping", tps, date);
                    summary.days_invalid += 1;
                }
                Err(e) => {
                    error!("Error processing date {}: {}", current, e);
                    summary.days_failed += 1;
                    sleep(self.settings.day_error_delay).await;
                }
            }

            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        info!(
            "Historical TPS calculation completed: {} stored, {} empty, {} invalid, {} failed",
            summary.days_stored, summary.days_empty, summary.days_invalid, summary.days_failed
        );
        Ok(summary)
    }

    /// First day to process, plus the checkpoint to resume it from.
    async fn initial_state(&self) -> Result<(NaiveDate, Option<Checkpoint>), BackfillError> {
        let mut start = match daily_tps::latest_daily_tps(&self.pool).await? {
            Some(record) if record.is_complete() => record.date.succ_opt().unwrap_or(record.date),
            Some(record) => {
                info!("Stored record for {} covers part of the day, recomputing it", record.date);
                record.date
            }
            None => self.settings.chain.launch_date,
        };

        let checkpoint = match self.checkpoints.load().await {
            Some(cp) if cp.date >= start => {
                start = cp.date;
                Some(cp)
            }
            Some(cp) => {
                warn!("Discarding stale checkpoint for already stored date {}", cp.date);
                if let Err(e) = self.checkpoints.clear().await {
                    warn!("Failed to clear stale checkpoint: {}", e);
                }
                None
            }
            None => None,
        };

        Ok((start, checkpoint))
    }

    async fn process_day(
        &mut self,
        date: NaiveDate,
        tip: u64,
        resume: Option<Checkpoint>,
    ) -> Result<DayOutcome, BackfillError> {
        let chain = self.settings.chain;

        let start_height = match &resume {
            Some(cp) => {
                info!(
                    "Resuming {} from checkpoint: height {}, transactions {}",
                    date, cp.current_height, cp.total_transactions
                );
                cp.start_height.unwrap_or(cp.current_height)
            }
            None => height_at_date(&mut self.fetcher, &chain, tip, midnight(date)).await?,
        };
        info!("Start height for {}: {}", date, start_height);

        let next_day = date.succ_opt().unwrap_or(date);
        let end_height = height_at_date(&mut self.fetcher, &chain, tip, midnight(next_day)).await?;
        info!("End height for {}: {}", date, end_height);

        if end_height <= start_height {
            if end_height < start_height {
                warn!("End height {} below start height {} for {}", end_height, start_height, date);
            }
            info!("No blocks for date {}, skipping", date);
            return Ok(DayOutcome::Empty);
        }

        let outcome = tally(
            &mut self.fetcher,
            self.checkpoints.as_ref(),
            date,
            start_height,
            end_height,
            resume.as_ref(),
        )
        .await?;
        let tps = compute_tps(date, &outcome)?;

        let record = NewDailyTps {
            date,
            tps,
            start_timestamp: outcome.start_timestamp,
            end_timestamp: outcome.end_timestamp,
            start_height,
            end_height,
        };
        daily_tps::upsert_daily_tps(&self.pool, &record).await?;
        info!("TPS for {}: {}", date, tps);

        if let Err(e) = self.checkpoints.clear().await {
            warn!("Failed to clear checkpoint after storing {}: {}", date, e);
        }

        Ok(DayOutcome::Stored)
    }
}
