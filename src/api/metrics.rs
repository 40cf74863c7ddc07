//! HTTP metrics middleware for Prometheus

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::{HTTP_IN_FLIGHT, HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL};

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

pub async fn http_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();

    // Nested static files report the mount pattern, not the file path
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    if route == "/metrics" {
        return next.run(req).await;
    }

    let in_flight = HTTP_IN_FLIGHT.with_label_values(&[method.as_str(), route.as_str()]);
    in_flight.inc();
    let start = Instant::now();

    let response = next.run(req).await;

    in_flight.dec();
    let class = status_class(response.status().as_u16());
    let labels = [method.as_str(), route.as_str(), class];
    HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&labels)
        .observe(start.elapsed().as_secs_f64());

    response
}
