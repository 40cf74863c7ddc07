use axum::{
    Json,
    extract::rejection::{FormRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AuthError {
    // Credential errors
    #[error("invalid API key")]
    InvalidApiKey,

    #[error("not authenticated: missing {0} header")]
    MissingApiKey(String),

    #[error("not authenticated: missing bearer token")]
    MissingBearer,

    #[error("user not found")]
    UserNotFound,

    #[error("incorrect password for user: {0}")]
    IncorrectPassword(String),

    #[error("incorrect username or password")]
    BadLogin,

    #[error("unsupported grant_type: {0}")]
    UnsupportedGrantType(String),

    // Token errors
    #[error("could not validate credentials")]
    InvalidToken { reason: String },

    #[error("token encoding failed: {0}")]
    TokenEncoding(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Request errors
    #[error("{0}")]
    BadRequest(String),

    // Config errors
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    pub fn invalid_token(reason: impl ToString) -> Self {
        Self::InvalidToken {
            reason: reason.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidApiKey
            | Self::MissingApiKey(_)
            | Self::MissingBearer
            | Self::BadLogin
            | Self::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
            Self::UserNotFound
            | Self::IncorrectPassword(_)
            | Self::UnsupportedGrantType(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the response should carry `WWW-Authenticate: Bearer`
    pub fn wants_bearer_challenge(&self) -> bool {
        matches!(
            self,
            Self::MissingBearer | Self::BadLogin | Self::InvalidToken { .. }
        )
    }

    /// Short label used for metrics and logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidApiKey => "invalid_api_key",
            Self::MissingApiKey(_) => "missing_api_key",
            Self::MissingBearer => "missing_bearer",
            Self::UserNotFound => "user_not_found",
            Self::IncorrectPassword(_) => "incorrect_password",
            Self::BadLogin => "bad_login",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::InvalidToken { .. } => "invalid_token",
            Self::TokenEncoding(_) => "token_encoding",
            Self::PasswordHash(_) => "password_hash",
            Self::Json(_) => "json",
            Self::BadRequest(_) => "bad_request",
            Self::Config(_) => "config",
        }
    }
}

impl From<QueryRejection> for AuthError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AuthError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable error detail
    pub detail: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        let mut response = (status, body).into_response();
        if self.wants_bearer_challenge() {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
