//! Response body helpers.

use axum::body::Body;
use axum::response::Response;
use serde_json::Value;

/// Drain a response body and parse it as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes: bytes::Bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
