//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// Every request gets an `INFO` span carrying method, URI and HTTP version.
/// The response is logged at `INFO` with status and latency in milliseconds;
/// 5xx responses (store faults, reservation contention) are additionally
/// logged at `ERROR`.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=PATCH uri=/api/expert/availability/7 version=HTTP/1.1}: finished processing request latency=3 ms status=200
/// INFO request{method=PATCH uri=/api/expert/availability/7 version=HTTP/1.1}: finished processing request latency=2 ms status=409
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
