use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

fn is_valid_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Assign a correlation ID to each request.
/// A well-formed client `x-request-id` is kept, otherwise a UUID is generated.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| is_valid_request_id(s))
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(val) = id.parse() {
        req.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    let span = tracing::info_span!("request", request_id = %id, path = %req.uri().path());
    let mut response = next.run(req).instrument(span).await;

    if let Ok(val) = id.parse() {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    response
}
