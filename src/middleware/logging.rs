//! Request logging middleware
//!
//! Tags every request with a request id, logs method, path, status and
//! latency, and echoes the id back in the `x-request-id` response header.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};

use crate::utils::helpers::generate_uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests slower than this are logged at `warn`
const SLOW_REQUEST_MS: u128 = 1000;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(generate_uuid);

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = info_span!("request", request_id = %request_id, method = %method, path = %path);
    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let duration_ms = started.elapsed().as_millis();

    let _entered = span.enter();
    let status = response.status().as_u16();
    if duration_ms > SLOW_REQUEST_MS {
        warn!(status = status, duration_ms = duration_ms, "Slow request");
    } else {
        info!(status = status, duration_ms = duration_ms, "Request completed");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
