use once_cell::sync::Lazy;
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramVec, TextEncoder, register_counter_vec,
    register_gauge_vec, register_histogram_vec,
};

// Auth metrics
pub static AUTH_FAILURES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "authdemo_auth_failures_total",
        "Total number of rejected credentials and tokens",
        &["demo", "reason"]
    )
    .unwrap()
});

pub static TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "authdemo_tokens_issued_total",
        "Total number of access tokens issued",
        &["demo"]
    )
    .unwrap()
});

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "authdemo_http_requests_total",
        "Total HTTP requests",
        &["method", "route", "status_class"]
    )
    .unwrap()
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "authdemo_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "route", "status_class"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap()
});

pub static HTTP_IN_FLIGHT: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "authdemo_http_in_flight_requests",
        "In-flight HTTP requests",
        &["method", "route"]
    )
    .unwrap()
});

/// Generate Prometheus metrics output
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Initialize all metrics (forces lazy statics to be created)
pub fn init_metrics() {
    Lazy::force(&AUTH_FAILURES);
    Lazy::force(&TOKENS_ISSUED);
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&HTTP_IN_FLIGHT);
}
