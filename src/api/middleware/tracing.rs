//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates the request tracing layer.
///
/// Every request gets an `INFO` span with method, URI and HTTP version. Arrival
/// is logged at `DEBUG`, completion at `INFO` with status and latency in
/// milliseconds. Server errors (5xx, including recovered panics) are also
/// logged at `ERROR`.
///
/// ```text
/// INFO request{method=GET uri=/api/v1/user/profile version=HTTP/1.1}: finished processing request latency=4 ms status=200
/// ```
pub fn layer()
-> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
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
