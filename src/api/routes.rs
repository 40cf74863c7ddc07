use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::docs::{OAUTH2_REDIRECT_URL, OPENAPI_URL, STATIC_MOUNT};
use super::handlers;
use crate::AppState;
use crate::config::Demo;

/// Routes every demo serves: docs redirect, viewers, schema, health, metrics
fn common_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::redirect_to_docs))
        .route("/docs", get(handlers::swagger_ui))
        .route(OAUTH2_REDIRECT_URL, get(handlers::swagger_ui_oauth2_redirect))
        .route("/redoc", get(handlers::redoc))
        .route(OPENAPI_URL, get(handlers::openapi_json))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
}

fn api_key_routes() -> Router<Arc<AppState>> {
    Router::new().route("/test", get(handlers::greet_with_api_key))
}

fn bearer_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/token", post(handlers::issue_bearer_token))
        .route("/test", get(handlers::greet_with_bearer))
}

fn oauth2_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/token", post(handlers::issue_oauth2_token))
        .route("/test", get(handlers::greet_with_oauth2))
}

fn docs_routes(state: &AppState) -> Router<Arc<AppState>> {
    Router::new()
        .route("/test", get(handlers::greet))
        .nest_service(STATIC_MOUNT, ServeDir::new(&state.settings.docs.static_dir))
}

fn common_layers(router: Router, body_limit: usize) -> Router {
    router
        .layer(axum::middleware::from_fn(super::request_id::request_id))
        .layer(axum::middleware::from_fn(super::metrics::http_metrics))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

/// Build the router for the demo selected in `state`
pub fn create_router(state: Arc<AppState>) -> Router {
    let demo_routes = match state.demo {
        Demo::ApiKey => api_key_routes(),
        Demo::Bearer => bearer_routes(),
        Demo::OAuth2 => oauth2_routes(),
        Demo::Docs => docs_routes(&state),
    };

    let router = common_routes()
        .merge(demo_routes)
        .with_state(state.clone());

    common_layers(router, state.settings.http.body_limit_bytes)
}
