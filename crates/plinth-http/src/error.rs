//! Taxonomy-to-HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::error;

use plinth_runtime::{ApiError, ErrorCode};

/// Structured error body carried on every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `INVALID_ARGUMENT`.
    pub code: &'static str,
    pub message: String,
}

/// Wrapper giving [`ApiError`] an HTTP rendering.
#[derive(Debug)]
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

/// Stable code → status mapping.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
        ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorCode::Aborted => StatusCode::CONFLICT,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let status = status_for(code);
        error!(code = %code, status = %status, error = %self.0, "request failed");
        (
            status,
            Json(ErrorBody {
                code: code.as_str(),
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
