//! Error taxonomy shared by the procedure server and the front end.
//!
//! # Design Decisions
//! - One enum for every failure an `Add` call can produce, on either side
//! - Converts both ways with `tonic::Status` so the wire code is preserved
//! - The HTTP mapping lives here too, next to the codes it translates

use axum::http::StatusCode;
use tonic::{Code, Status};

/// Failure of a single `Add` call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    /// Malformed or out-of-range numeric input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The downstream connection is not ready, was lost, or has been closed.
    #[error("procedure server unavailable: {0}")]
    Unavailable(String),

    /// The call was cancelled, usually by a shutdown in progress.
    #[error("call cancelled")]
    Cancelled,

    /// The call did not complete before its deadline.
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Any other status reported by the procedure server.
    #[error("procedure server returned {code:?}: {message}")]
    Remote { code: Code, message: String },
}

impl CalcError {
    /// HTTP status the front end answers with for this failure.
    pub fn http_status(&self) -> StatusCode {
        match self {
            CalcError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CalcError::Unavailable(_) | CalcError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            CalcError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            CalcError::Remote { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message placed in the `error` field of a JSON error body.
    pub fn public_message(&self) -> String {
        match self {
            CalcError::InvalidArgument(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<Status> for CalcError {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::InvalidArgument => CalcError::InvalidArgument(message),
            Code::Unavailable => CalcError::Unavailable(message),
            Code::Cancelled => CalcError::Cancelled,
            Code::DeadlineExceeded => CalcError::DeadlineExceeded(message),
            code => CalcError::Remote { code, message },
        }
    }
}

impl From<CalcError> for Status {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::InvalidArgument(message) => Status::invalid_argument(message),
            CalcError::Unavailable(message) => Status::unavailable(message),
            CalcError::Cancelled => Status::cancelled("call cancelled"),
            CalcError::DeadlineExceeded(message) => Status::deadline_exceeded(message),
            CalcError::Remote { code, message } => Status::new(code, message),
        }
    }
}
