//! Metrics Middleware
//!
//! Records request counts and latency into the Prometheus registry.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::infrastructure::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

/// Track request count and duration per method/path/status
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // The matched route pattern would be ideal; the raw path is close
    // enough for this API's fixed route shapes
    let path = request.uri().path().to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(elapsed);

    response
}
