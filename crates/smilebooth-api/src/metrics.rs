//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

use smilebooth_models::ClassifierHealth;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "smilebooth_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "smilebooth_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "smilebooth_http_requests_in_flight";

    // Detection metrics
    pub const DETECTIONS_TOTAL: &str = "smilebooth_detections_total";
    pub const DETECTION_DURATION_SECONDS: &str = "smilebooth_detection_duration_seconds";
    pub const FACES_PER_FRAME: &str = "smilebooth_faces_per_frame";

    // Capture metrics
    pub const CAPTURES_TOTAL: &str = "smilebooth_captures_total";

    // Classifier health
    pub const CLASSIFIER_LOADED: &str = "smilebooth_classifier_loaded";
}

/// Outcome label of a detection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionLabel {
    Smile,
    NoSmile,
    Unavailable,
    Error,
}

impl DetectionLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::NoSmile => "no_smile",
            Self::Unavailable => "unavailable",
            Self::Error => "error",
        }
    }
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a detection request.
pub fn record_detection(label: DetectionLabel, duration_secs: f64) {
    let labels = [("outcome", label.as_str().to_string())];
    counter!(names::DETECTIONS_TOTAL, &labels).increment(1);
    histogram!(names::DETECTION_DURATION_SECONDS).record(duration_secs);
}

/// Record how many faces the face pass reported.
pub fn record_faces_found(count: usize) {
    histogram!(names::FACES_PER_FRAME).record(count as f64);
}

/// Record a capture save attempt.
pub fn record_capture(success: bool) {
    let labels = [("result", if success { "saved" } else { "failed" }.to_string())];
    counter!(names::CAPTURES_TOTAL, &labels).increment(1);
}

/// Publish the classifier health flags.
pub fn set_classifier_health(health: ClassifierHealth) {
    for (name, loaded) in [("face", health.face_loaded), ("smile", health.smile_loaded)] {
        let labels = [("classifier", name.to_string())];
        gauge!(names::CLASSIFIER_LOADED, &labels).set(if loaded { 1.0 } else { 0.0 });
    }
}

/// Sanitize path for metrics labels (collapse per-file static paths).
fn sanitize_path(path: &str) -> String {
    if path.starts_with("/static/") {
        "/static/:file".to_string()
    } else {
        path.to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
