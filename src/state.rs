use crate::backfill::BackfillGuard;
use crate::blockchain::client::{ClientError, HttpTransport, RpcTransport};
use crate::cache::{self, BlockCacheManager};
use crate::checkpoint::{CheckpointStore, FileCheckpointStore};
use crate::config::Config;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub db_pool: SqlitePool,
    pub cache: BlockCacheManager,
    pub transport: Arc<dyn RpcTransport>,
    pub checkpoints: Arc<dyn CheckpointStore>,
    pub backfill_guard: BackfillGuard,
}

impl AppState {
    /// Wire up the production collaborators: HTTP transport and file checkpoints.
    pub fn new(config: Config, db_pool: SqlitePool) -> Result<Self, ClientError> {
        let transport: Arc<dyn RpcTransport> = Arc::new(HttpTransport::new(&config)?);
        let checkpoints: Arc<dyn CheckpointStore> =
            Arc::new(FileCheckpointStore::new(&config.checkpoint_path));

        Ok(Self {
            cache: cache::init_cache(&config),
            config,
            db_pool,
            transport,
            checkpoints,
            backfill_guard: BackfillGuard::new(),
        })
    }
}
