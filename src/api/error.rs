//! API error mapping.

use crate::errors::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Wrapper converting core errors into HTTP responses.
///
/// Validation problems and bad codes answer 400, unknown orders 404;
/// everything else collapses into an opaque 500 after logging.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation { fields } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "status": "error",
                    "message": "missing required fields",
                    "fields": fields,
                })),
            )
                .into_response(),
            Error::OrderNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "status": "not_found" })),
            )
                .into_response(),
            Error::InvalidCode => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "status": "error",
                    "message": "invalid or already redeemed code",
                })),
            )
                .into_response(),
            Error::UnknownPlan { plan_id } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "status": "error",
                    "message": format!("unknown plan: {plan_id}"),
                })),
            )
                .into_response(),
            err => {
                error!("request failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "status": "error", "message": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}
