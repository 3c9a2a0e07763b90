//! Historical backfill: walks the chain day by day from launch to now, storing
//! one TPS figure per calendar day and checkpointing after every block.

pub mod accumulator;
pub mod driver;

pub use accumulator::{compute_tps, tally, TallyOutcome};
pub use driver::{BackfillDriver, BackfillSummary};

use crate::blockchain::client::ClientError;
use crate::checkpoint::CheckpointError;
use crate::config::{ChainParams, Config};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Error, Debug)]
pub enum BackfillError {
    #[error("Blockchain client error: {0}")]
    Client(#[from] ClientError),

    #[error("Invalid TPS {tps} computed for {date}")]
    InvalidTps { date: NaiveDate, tps: f64 },

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("A historical backfill is already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy)]
pub struct BackfillSettings {
    pub chain: ChainParams,
    pub liveness_timeout: Duration,
    /// Pause after a day fails, before moving on to the next one.
    pub day_error_delay: Duration,
}

impl BackfillSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chain: config.chain,
            liveness_timeout: config.liveness_timeout,
            day_error_delay: config.day_error_delay,
        }
    }
}

/// Allows at most one backfill run at a time.
#[derive(Debug, Clone, Default)]
pub struct BackfillGuard {
    lock: Arc<Mutex<()>>,
}

pub type BackfillPermit = OwnedMutexGuard<()>;

impl BackfillGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<BackfillPermit, BackfillError> {
        self.lock
            .clone()
            .try_lock_owned()
            .map_err(|_| BackfillError::AlreadyRunning)
    }

    pub fn is_running(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}
