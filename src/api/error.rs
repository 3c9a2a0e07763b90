use crate::backfill::BackfillError;
use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Calculation already in progress")]
    Conflict,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unable to fetch historical TPS data".to_string(),
            ),
            ApiError::Conflict => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidParameter(err.to_string())
    }
}

impl From<BackfillError> for ApiError {
    fn from(err: BackfillError) -> Self {
        match err {
            BackfillError::AlreadyRunning => ApiError::Conflict,
            BackfillError::Persistence(e) => ApiError::Database(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
