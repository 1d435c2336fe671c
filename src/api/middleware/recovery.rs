//! Panic recovery producing a uniform 500 response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Creates the outermost layer of the pipeline.
///
/// A panic anywhere downstream becomes
/// `500 {"error": "Internal server error: <fault>"}`. The panic hook installed
/// by [`crate::telemetry::init`] has already logged the location and a
/// backtrace by the time this runs.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let fault = panic_message(payload.as_ref());

    tracing::error!(fault = %fault, "Recovered from panic");
    metrics::counter!("panics_recovered_total").increment(1);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("Internal server error: {fault}") })),
    )
        .into_response()
}

/// Renders a panic payload; `panic!` produces `&str` or `String`.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
