//! JSON response bodies and error mapping.
//!
//! # Design Decisions
//! - Every error is `{"error": "<message>"}` with a status from `CalcError::http_status`
//! - Downstream failures never crash the process; each becomes one error response

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::BoxError;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower::timeout::error::Elapsed;

use crate::error::CalcError;

/// Message returned when `a` or `b` cannot be read as an integer.
pub const INVALID_OPERANDS: &str = "a and b must be integers";

/// Message returned when the body is not a JSON object.
pub const INVALID_BODY: &str = "request body must be a JSON object";

/// Message returned when a request outlives `web.request_timeout_secs`.
pub const REQUEST_TIMED_OUT: &str = "request timed out";

/// Successful `/api/add` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumBody {
    pub sum: i64,
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error answer from the JSON API.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        Self {
            status: err.http_status(),
            message: err.public_message(),
        }
    }
}

/// Turn a middleware failure into a JSON error.
///
/// The request timeout is the only fallible layer in the stack.
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::new(StatusCode::REQUEST_TIMEOUT, REQUEST_TIMED_OUT)
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downstream_errors_keep_their_status() {
        let err = ApiError::from(CalcError::Unavailable("connection closed".into()));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(CalcError::InvalidArgument("overflow".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "overflow");
    }

    #[tokio::test]
    async fn elapsed_request_is_408_with_json_body() {
        let err = handle_middleware_error(Box::new(Elapsed::new())).await;
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);

        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, REQUEST_TIMED_OUT);
    }

    #[tokio::test]
    async fn other_middleware_errors_are_500() {
        let err = handle_middleware_error("boom".into()).await;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_renders_as_json() {
        let response = ApiError::bad_request(INVALID_OPERANDS).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, INVALID_OPERANDS);
    }
}
