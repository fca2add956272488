//! Error types for the dashboard API.
//!
//! [`ApiError`] can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pokedex_db::DbError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No species matches the request. Answered with an empty body.
    #[error("not found")]
    NotFound,

    /// The data layer failed.
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Database(e) => {
                tracing::error!(error = %e, "Request failed in the data layer");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = serde_json::json!({
                    "error": "database error",
                    "status": status.as_u16(),
                });
                (status, axum::Json(body)).into_response()
            }
        }
    }
}
