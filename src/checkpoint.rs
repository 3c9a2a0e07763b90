//! Durable single-slot progress marker for the day being tallied.

use crate::models::Checkpoint;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("Checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checkpoint serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage for at most one active checkpoint. Saving overwrites; an absent
/// checkpoint means no day is in progress.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Unreadable state is reported as absent.
    async fn load(&self) -> Option<Checkpoint>;

    async fn clear(&self) -> Result<(), CheckpointError>;
}

/// JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let body = serde_json::to_vec_pretty(checkpoint)?;

        // Readers only ever see a complete document.
        let staging = self.staging_path();
        tokio::fs::write(&staging, body).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!(
            "Checkpoint saved: date {}, height {}, transactions {}",
            checkpoint.date, checkpoint.current_height, checkpoint.total_transactions
        );
        Ok(())
    }

    async fn load(&self) -> Option<Checkpoint> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No checkpoint at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice::<Checkpoint>(&data) {
            Ok(checkpoint) => {
                info!(
                    "Loaded checkpoint: date {}, height {}, transactions {}",
                    checkpoint.date, checkpoint.current_height, checkpoint.total_transactions
                );
                Some(checkpoint)
            }
            Err(e) => {
                warn!("Ignoring unreadable checkpoint {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn clear(&self) -> Result<(), CheckpointError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Checkpoint cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
