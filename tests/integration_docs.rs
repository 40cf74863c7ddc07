mod common;

use axum::Router;
use axum::http::StatusCode;
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

use authdemo::AppState;
use authdemo::config::{Demo, Settings};

use common::*;

const BUNDLE_JS: &str = "window.SwaggerUIBundle = function () {};";

fn setup_docs_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("swagger-ui-bundle.js"), BUNDLE_JS).unwrap();
    fs::write(dir.path().join("swagger-ui.css"), "body {}").unwrap();

    let mut settings = Settings::default();
    settings.docs.static_dir = dir.path().to_path_buf();

    (setup_app_with(Demo::Docs, settings), dir)
}

#[tokio::test]
async fn test_docs_demo_requires_static_dir() {
    let mut settings = Settings::default();
    settings.docs.static_dir = "/nonexistent/authdemo/static".into();

    assert!(AppState::new(Demo::Docs, settings).is_err());
}

#[tokio::test]
async fn test_root_redirects_to_docs() {
    let (app, _dir) = setup_docs_app();

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get("location").unwrap(), "/docs");
}

#[tokio::test]
async fn test_swagger_ui_uses_local_assets() {
    let (app, _dir) = setup_docs_app();

    let response = app.oneshot(get("/docs")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("My API - Swagger UI"));
    assert!(html.contains("/static/swagger-ui-bundle.js"));
    assert!(html.contains("/static/swagger-ui.css"));
    assert!(html.contains("/openapi.json"));
    assert!(html.contains("/docs/oauth2-redirect"));
    assert!(!html.contains("cdn.jsdelivr.net"));
}

#[tokio::test]
async fn test_swagger_ui_oauth2_redirect_page() {
    let (app, _dir) = setup_docs_app();

    let response = app.oneshot(get("/docs/oauth2-redirect")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("swaggerUIRedirectOauth2"));
}

#[tokio::test]
async fn test_redoc_uses_local_bundle() {
    let (app, _dir) = setup_docs_app();

    let response = app.oneshot(get("/redoc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("My API - ReDoc"));
    assert!(html.contains("/static/redoc.standalone.js"));
}

#[tokio::test]
async fn test_static_files_served() {
    let (app, _dir) = setup_docs_app();

    let response = app
        .clone()
        .oneshot(get("/static/swagger-ui-bundle.js"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, BUNDLE_JS);

    let response = app.oneshot(get("/static/missing.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_customized() {
    let (app, _dir) = setup_docs_app();

    let response = app.oneshot(get("/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert_eq!(doc["info"]["title"], "My API");
    assert_eq!(doc["info"]["version"], "1.0.0");
    assert_eq!(
        doc["info"]["description"],
        "This custom SWAGGER documentation"
    );
    assert_eq!(
        doc["info"]["x-logo"]["url"],
        "/static/flaticon_cache_icon.png"
    );
    assert!(doc["paths"]["/test"].is_object());
}

#[tokio::test]
async fn test_openapi_document_stable_across_requests() {
    let (app, _dir) = setup_docs_app();

    let first = body_json(app.clone().oneshot(get("/openapi.json")).await.unwrap()).await;
    let second = body_json(app.oneshot(get("/openapi.json")).await.unwrap()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_docs_demo_greeting_needs_no_credentials() {
    let (app, _dir) = setup_docs_app();

    let response = app.oneshot(get("/test?name=Reader")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, "Hello, Reader!");
}
