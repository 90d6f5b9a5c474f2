use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build the request-id layer. Apply with `.layer(request_id_layer())` in router.
/// An incoming `x-request-id` header is kept as is.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeUuidRequestId)
}

/// Copy the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Request id assigned by [`request_id_layer`], empty when the layer did not run.
pub fn request_id_of<B>(request: &Request<B>) -> &str {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default()
}

/// Opens the per-request span with the request id attached, so every event
/// logged while handling the request carries it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdSpan;

impl<B> MakeSpan<B> for RequestIdSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            request_id = request_id_of(request),
            method = %request.method(),
            uri = %request.uri(),
        )
    }
}

/// Per-request span + method/uri/status/latency events. Must sit inside
/// `request_id_layer()` so the id is already set.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestIdSpan> {
    TraceLayer::new_for_http().make_span_with(RequestIdSpan)
}
