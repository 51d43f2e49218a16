//! The `Add` procedure.

use tonic::{Request, Response, Status};

use crate::error::CalcError;
use crate::http::request::X_REQUEST_ID;
use crate::rpc::proto::calculator_server::Calculator;
use crate::rpc::proto::{AddReply, AddRequest};

/// Add two integers, failing instead of wrapping on overflow.
pub fn add(a: i64, b: i64) -> Result<i64, CalcError> {
    a.checked_add(b).ok_or_else(|| {
        CalcError::InvalidArgument(format!("{} + {} overflows a 64-bit integer", a, b))
    })
}

/// Stateless implementation of `calc.Calculator`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorService;

#[tonic::async_trait]
impl Calculator for CalculatorService {
    async fn add(&self, request: Request<AddRequest>) -> Result<Response<AddReply>, Status> {
        let request_id = request
            .metadata()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let AddRequest { a, b } = request.into_inner();

        match add(a, b) {
            Ok(sum) => {
                tracing::debug!(request_id = %request_id, a, b, sum, "Add");
                Ok(Response::new(AddReply { sum }))
            }
            Err(e) => {
                tracing::warn!(request_id = %request_id, a, b, error = %e, "Add rejected");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn adds_within_range() {
        for (a, b) in [(1, 2), (0, 0), (-5, 3), (i64::MAX, 0), (i64::MIN, 0), (i64::MAX, i64::MIN)] {
            assert_eq!(add(a, b).unwrap(), a + b);
        }
    }

    #[test]
    fn overflow_is_invalid_argument() {
        assert!(matches!(add(i64::MAX, 1), Err(CalcError::InvalidArgument(_))));
        assert!(matches!(add(i64::MIN, -1), Err(CalcError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn service_replies_with_sum() {
        let reply = CalculatorService
            .add(Request::new(AddRequest { a: 40, b: 2 }))
            .await
            .unwrap();
        assert_eq!(reply.into_inner().sum, 42);
    }

    #[tokio::test]
    async fn service_rejects_overflow() {
        let status = CalculatorService
            .add(Request::new(AddRequest { a: i64::MAX, b: 1 }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }
}
