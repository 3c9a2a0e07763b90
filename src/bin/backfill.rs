// One-shot historical backfill: resume from the last checkpoint or stored day,
// run until today, then exit.

use chain_tps_service::{config::Config, db, logging, service, state::AppState};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let db_pool = match db::connection::establish_connection(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Database connection established");

    let state = match AppState::new(config, db_pool) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize RPC transport: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let permit = match state.backfill_guard.try_acquire() {
        Ok(permit) => permit,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = service::run_full_backfill(&state, &permit).await;

    match outcome {
        Ok(summary) => {
            info!("Calculation complete: {:?}", summary);
            match service::list_daily_records(&state, None, None).await {
                Ok(records) => {
                    for record in records.iter().rev().take(5) {
                        info!(
                            "{}: {:.6} tps (heights {}-{})",
                            record.date, record.tps, record.start_height, record.end_height
                        );
                    }
                }
                Err(e) => error!("Error displaying stored data: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Calculation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
