use crate::{
    api::{
        error::ApiError,
        response::{with_total_count, ApiResponse},
    },
    db::daily_tps,
    service,
    state::AppState,
    validation::validate_date_range,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

// GET /historical-tps query parameters
#[derive(Deserialize)]
pub struct HistoryQuery {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Serialize)]
struct RunAccepted {
    message: &'static str,
}

#[derive(Serialize)]
struct BackfillStatus {
    running: bool,
    stored_days: i64,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/historical-tps", get(get_historical_tps))
        .route("/historical-tps/run", post(run_historical_tps))
        .route("/historical-tps/status", get(get_status))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

// GET /historical-tps handler
async fn get_historical_tps(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let (from, to) = validate_date_range(params.from.as_deref(), params.to.as_deref())?;

    let records = service::list_daily_records(&state, from, to).await?;
    let total = records.len();
    info!("Returning {} daily TPS records", total);

    Ok(with_total_count(records, total))
}

// POST /historical-tps/run handler
async fn run_historical_tps(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let permit = state.backfill_guard.try_acquire()?;

    let task_state = state.clone();
    tokio::spawn(async move {
        match service::run_full_backfill(&task_state, &permit).await {
            Ok(summary) => info!("Historical TPS calculation completed successfully: {:?}", summary),
            Err(e) => error!("Error running historical TPS calculation: {}", e),
        }
    });

    info!("Historical TPS calculation started");
    Ok(ApiResponse {
        data: RunAccepted {
            message: "Historical TPS calculation started",
        },
    }
    .with_status(StatusCode::ACCEPTED))
}

// GET /historical-tps/status handler
async fn get_status(State(state): State<Arc<AppState>>) -> Result<ApiResponse<BackfillStatus>, ApiError> {
    let stored_days = daily_tps::count_daily_tps(&state.db_pool).await?;

    Ok(ApiResponse {
        data: BackfillStatus {
            running: state.backfill_guard.is_running(),
            stored_days,
        },
    })
}
