pub mod api;
pub mod backfill;
pub mod blockchain;
pub mod cache;
pub mod checkpoint;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience if desired
pub use api::error::ApiError;
pub use api::route::create_router;
pub use backfill::{BackfillDriver, BackfillError, BackfillGuard, BackfillSummary};
pub use blockchain::resolver::height_at_date;
pub use checkpoint::{CheckpointStore, FileCheckpointStore};
pub use config::{ChainParams, Config};
pub use models::{Checkpoint, DailyTpsRecord};
pub use state::AppState;
