use axum::{
    Form, Json,
    extract::{
        Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::header,
    response::{Html, IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::docs::{self, DocAssets};
use crate::AppState;
use crate::auth::{ApiKey, CurrentUser, UnverifiedClaims, reject};
use crate::error::{AuthError, ErrorResponse};
use crate::observability::TOKENS_ISSUED;

// Request types

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GreetQuery {
    /// Name to greet
    pub name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PasswordQuery {
    pub username: String,
    pub password: String,
}

/// OAuth2 password-flow token request, sent form-encoded
#[derive(Debug, Deserialize, ToSchema)]
pub struct OAuth2PasswordRequest {
    /// Must be `password` when present
    #[serde(default)]
    pub grant_type: Option<String>,
    pub username: String,
    pub password: String,
    /// Space separated scopes. Accepted and ignored.
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

// Response types

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed JWT
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    demo: String,
    uptime_seconds: u64,
}

/// Unwrap the request parameters, turning a rejection into a JSON `detail` body
fn parsed<T, E>(extracted: Result<T, E>) -> Result<T, AuthError>
where
    E: Into<AuthError> + std::fmt::Display,
{
    extracted.map_err(|rejection| {
        tracing::warn!(error = %rejection, "invalid request parameters");
        rejection.into()
    })
}

fn greeting(query: Result<Query<GreetQuery>, QueryRejection>) -> Result<Json<String>, AuthError> {
    let Query(query) = parsed(query)?;
    Ok(Json(format!("Hello, {}!", query.name)))
}

// Greeting endpoints, one per demo

/// Greeting guarded by the API key header
#[utoipa::path(
    get,
    path = "/test",
    tag = "demo",
    params(GreetQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Greeting", body = String),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse)
    )
)]
pub async fn greet_with_api_key(
    _key: ApiKey,
    query: Result<Query<GreetQuery>, QueryRejection>,
) -> Result<Json<String>, AuthError> {
    greeting(query)
}

/// Greeting guarded by a bearer token whose signature is not checked
#[utoipa::path(
    get,
    path = "/test",
    tag = "demo",
    params(GreetQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting", body = String),
        (status = 401, description = "Missing or undecodable token", body = ErrorResponse)
    )
)]
pub async fn greet_with_bearer(
    UnverifiedClaims(claims): UnverifiedClaims,
    query: Result<Query<GreetQuery>, QueryRejection>,
) -> Result<Json<String>, AuthError> {
    tracing::debug!(exp = ?claims.exp, "bearer token accepted");
    greeting(query)
}

/// Greeting for the user named by a verified OAuth2 token
#[utoipa::path(
    get,
    path = "/test",
    tag = "demo",
    params(GreetQuery),
    security(("oauth2_password" = [])),
    responses(
        (status = 200, description = "Greeting", body = String),
        (status = 401, description = "Invalid token or unknown user", body = ErrorResponse)
    )
)]
pub async fn greet_with_oauth2(
    CurrentUser(user): CurrentUser,
    query: Result<Query<GreetQuery>, QueryRejection>,
) -> Result<Json<String>, AuthError> {
    tracing::debug!(username = %user.username, "oauth2 user resolved");
    greeting(query)
}

/// Unauthenticated greeting
#[utoipa::path(
    get,
    path = "/test",
    tag = "demo",
    params(GreetQuery),
    responses(
        (status = 200, description = "Greeting", body = String)
    )
)]
pub async fn greet(
    query: Result<Query<GreetQuery>, QueryRejection>,
) -> Result<Json<String>, AuthError> {
    greeting(query)
}

// Token endpoints

/// Issue an expiry-only token for a plaintext username/password pair
#[utoipa::path(
    post,
    path = "/token",
    tag = "auth",
    params(PasswordQuery),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unknown user or wrong password", body = ErrorResponse)
    )
)]
pub async fn issue_bearer_token(
    State(state): State<Arc<AppState>>,
    req: Result<Query<PasswordQuery>, QueryRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Query(req) = parsed(req)?;

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| reject(&state, AuthError::UserNotFound))?;

    if !user.verify_password(&req.password) {
        return Err(reject(
            &state,
            AuthError::IncorrectPassword(user.username.clone()),
        ));
    }

    let access_token = state.tokens.issue(None)?;

    TOKENS_ISSUED.with_label_values(&[state.demo.as_str()]).inc();
    tracing::info!(username = %user.username, "access token issued");

    Ok(Json(TokenResponse::bearer(access_token)))
}

/// OAuth2 password flow: verify the hashed password and issue a token for the user
#[utoipa::path(
    post,
    path = "/token",
    tag = "auth",
    request_body(content = OAuth2PasswordRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unsupported grant type", body = ErrorResponse),
        (status = 401, description = "Incorrect username or password", body = ErrorResponse)
    )
)]
pub async fn issue_oauth2_token(
    State(state): State<Arc<AppState>>,
    req: Result<Form<OAuth2PasswordRequest>, FormRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Form(req) = parsed(req)?;

    if let Some(grant_type) = req.grant_type.as_deref() {
        if grant_type != "password" {
            return Err(reject(
                &state,
                AuthError::UnsupportedGrantType(grant_type.to_string()),
            ));
        }
    }

    let user = match state.users.find_by_username(&req.username).await? {
        Some(user) if user.verify_password(&req.password) => user,
        _ => return Err(reject(&state, AuthError::BadLogin)),
    };

    let access_token = state.tokens.issue(Some(&user.username))?;

    TOKENS_ISSUED.with_label_values(&[state.demo.as_str()]).inc();
    tracing::info!(username = %user.username, "access token issued");

    Ok(Json(TokenResponse::bearer(access_token)))
}

// Documentation endpoints

pub async fn redirect_to_docs() -> Redirect {
    Redirect::temporary("/docs")
}

fn doc_title(state: &AppState) -> Result<String, AuthError> {
    Ok(state.openapi()?["info"]["title"]
        .as_str()
        .unwrap_or("API")
        .to_string())
}

pub async fn swagger_ui(State(state): State<Arc<AppState>>) -> Result<Html<String>, AuthError> {
    let assets = DocAssets::for_demo(state.demo, &state.settings.docs);
    Ok(Html(docs::swagger_ui_html(&doc_title(&state)?, &assets)))
}

pub async fn swagger_ui_oauth2_redirect() -> Html<&'static str> {
    Html(docs::OAUTH2_REDIRECT_HTML)
}

pub async fn redoc(State(state): State<Arc<AppState>>) -> Result<Html<String>, AuthError> {
    let assets = DocAssets::for_demo(state.demo, &state.settings.docs);
    Ok(Html(docs::redoc_html(&doc_title(&state)?, &assets)))
}

pub async fn openapi_json(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AuthError> {
    Ok(Json(state.openapi()?.clone()))
}

// Operational endpoints

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        demo: state.demo.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::observability::gather_metrics(),
    )
}
