use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Liveness check for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a database probe to a readiness report: 200 when ready, 503 otherwise.
///
/// Body: `{"status": "ok"|"error", "info": {"database": {"status": "up"|"down"}}}`.
pub fn readiness<E: std::fmt::Display>(probe: Result<(), E>) -> (StatusCode, Json<Value>) {
    let (code, status, database) = match probe {
        Ok(()) => (StatusCode::OK, "ok", "up"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "error", "down")
        }
    };
    let body = json!({
        "status": status,
        "info": { "database": { "status": database } },
    });
    (code, Json(body))
}
