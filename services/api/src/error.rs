use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use blink_common::error::BlinkError;
use blink_scoring::ScoringError;

pub struct ApiError(pub BlinkError);

impl From<BlinkError> for ApiError {
    fn from(err: BlinkError) -> Self {
        Self(err)
    }
}

/// Engine failures get their own statuses: a too-short ledger is a
/// client-resolvable 422, a broken invariant is a 500.
impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        Self(match err {
            ScoringError::InsufficientHistory { observed_days } => {
                BlinkError::InsufficientHistory { observed_days }
            }
            ScoringError::Computation(message) => BlinkError::Scoring(message),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            BlinkError::InsufficientHistory { observed_days } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "error": "insufficient_history",
                    "observed_days": observed_days,
                }),
            ),
            BlinkError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": message }),
            ),
            BlinkError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": message }),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": other.to_string() }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
