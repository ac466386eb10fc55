//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "memo_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "memo_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "memo_http_requests_in_flight";

    // Script pipeline metrics
    pub const SCRIPTS_GENERATED_TOTAL: &str = "memo_scripts_generated_total";
    pub const SCRIPTS_FAILED_TOTAL: &str = "memo_scripts_failed_total";
    pub const SCRIPT_DURATION_SECONDS: &str = "memo_script_duration_seconds";
    pub const SCENES_ASSEMBLED_TOTAL: &str = "memo_scenes_assembled_total";

    // Face extraction metrics
    pub const FACES_EXTRACTED_TOTAL: &str = "memo_faces_extracted_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "memo_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a completed script generation.
pub fn record_script_generated(script_type: &str, scenes: usize, duration_secs: f64) {
    let labels = [("type", script_type.to_string())];
    counter!(names::SCRIPTS_GENERATED_TOTAL, &labels).increment(1);
    counter!(names::SCENES_ASSEMBLED_TOTAL, &labels).increment(scenes as u64);
    histogram!(names::SCRIPT_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a failed script generation.
pub fn record_script_failed(script_type: &str) {
    let labels = [("type", script_type.to_string())];
    counter!(names::SCRIPTS_FAILED_TOTAL, &labels).increment(1);
}

/// Record extracted face crops.
pub fn record_faces_extracted(count: usize) {
    counter!(names::FACES_EXTRACTED_TOTAL).increment(count as u64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
