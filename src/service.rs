// Operations offered to the HTTP layer and the binaries: run the historical
// backfill, and read back what it stored.

use crate::backfill::{BackfillDriver, BackfillError, BackfillPermit, BackfillSettings, BackfillSummary};
use crate::blockchain::fetcher::{BlockFetcher, FetchPolicy, NodeRotation};
use crate::db::daily_tps;
use crate::models::DailyTpsRecord;
use crate::state::AppState;
use chrono::{NaiveDate, Utc};
use tracing::info;

/// Run the full historical backfill once.
///
/// Holding a [`BackfillPermit`] is what keeps two runs from sharing the
/// checkpoint. Re-running resumes where the previous run stopped.
pub async fn run_full_backfill(
    state: &AppState,
    _permit: &BackfillPermit,
) -> Result<BackfillSummary, BackfillError> {
    let fetcher = BlockFetcher::new(
        state.transport.clone(),
        NodeRotation::new(state.config.rpc_nodes.clone()),
        state.cache.clone(),
        FetchPolicy::from_config(&state.config),
    );
    let mut driver = BackfillDriver::new(
        fetcher,
        state.checkpoints.clone(),
        state.db_pool.clone(),
        BackfillSettings::from_config(&state.config),
    );

    let started = Utc::now();
    let summary = driver.run(started).await?;
    info!(
        "Backfill started at {} finished after {}s",
        started,
        (Utc::now() - started).num_seconds()
    );
    Ok(summary)
}

/// Stored daily records ordered by date, for display.
pub async fn list_daily_records(
    state: &AppState,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<DailyTpsRecord>, sqlx::Error> {
    daily_tps::list_daily_tps(&state.db_pool, from, to).await
}
