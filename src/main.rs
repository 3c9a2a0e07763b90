// Load configuration
// Set up logging
// Create database connection pool
// Create shared state
// Start HTTP server; backfill runs are triggered through the API

use chain_tps_service::{api, config::Config, db, logging, state::AppState};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing();

    tracing::info!("Starting chain-tps-service");

    // A missing DATABASE_URL or malformed setting stops startup here.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Configuration loaded: {:?}", config);

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Service stopped with error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Setup database connection
    let db_pool = db::connection::establish_connection(&config.database_url).await?;
    info!("Database connection established");

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let app_state = Arc::new(AppState::new(config, db_pool)?);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        signal_token.cancel();
    });

    let app = api::create_router(app_state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
