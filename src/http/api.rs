//! `POST /api/add`: JSON proxy to the procedure server.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{Map, Value};

use crate::http::request::request_id;
use crate::http::response::{ApiError, SumBody, INVALID_BODY, INVALID_OPERANDS};
use crate::http::server::AppState;

/// Read one operand the way the page's users expect.
///
/// Absent fields count as `0`. Integers are taken as-is, booleans become `1`
/// or `0`, finite floats are truncated toward zero, and strings are parsed as
/// base-10 integers. Values outside the signed 64-bit range and every other
/// JSON type are rejected.
pub fn coerce_operand(value: Option<&Value>) -> Option<i64> {
    match value {
        None => Some(0),
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(f64::trunc)
                .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Parse the request body into the two operands.
pub fn parse_operands(body: &[u8]) -> Result<(i64, i64), ApiError> {
    let payload: Map<String, Value> =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request(INVALID_BODY))?;

    match (coerce_operand(payload.get("a")), coerce_operand(payload.get("b"))) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ApiError::bad_request(INVALID_OPERANDS)),
    }
}

/// Handler for `POST /api/add`.
pub async fn add_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SumBody>, ApiError> {
    let request_id = request_id(&headers);
    let (a, b) = parse_operands(&body).inspect_err(|e| {
        tracing::debug!(request_id = ?request_id, status = %e.status(), "Rejected input");
    })?;

    match state.connection.add(a, b, request_id).await {
        Ok(sum) => Ok(Json(SumBody { sum })),
        Err(e) => {
            tracing::warn!(
                request_id = ?request_id,
                target = %state.connection.target(),
                error = %e,
                "Procedure call failed"
            );
            Err(e.into())
        }
    }
}
