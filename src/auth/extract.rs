//! Axum extractors that gate handlers behind each demo's credential check

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use super::{Claims, User, check_api_key, extract_bearer_token};
use crate::AppState;
use crate::error::AuthError;
use crate::observability::AUTH_FAILURES;

/// Log and count a failed check, then hand the error back for the response
pub(crate) fn reject(state: &AppState, err: AuthError) -> AuthError {
    match &err {
        AuthError::InvalidToken { reason } => {
            tracing::warn!(demo = %state.demo, reason = %reason, "token rejected");
        }
        _ => {
            tracing::warn!(demo = %state.demo, reason = err.reason(), "authentication failed");
        }
    }
    AUTH_FAILURES
        .with_label_values(&[state.demo.as_str(), err.reason()])
        .inc();
    err
}

fn bearer_token<'a>(parts: &'a Parts) -> Option<&'a str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
}

/// A request that presented the configured API key
#[derive(Debug)]
pub struct ApiKey(pub String);

impl FromRequestParts<Arc<AppState>> for ApiKey {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_name = state.settings.auth.api_key_header.as_str();
        let provided = parts
            .headers
            .get(header_name)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| reject(state, AuthError::MissingApiKey(header_name.to_string())))?;

        check_api_key(&state.settings.auth.api_key, provided).map_err(|e| reject(state, e))?;

        Ok(ApiKey(provided.to_string()))
    }
}

/// Claims from a bearer token decoded without signature verification
#[derive(Debug)]
pub struct UnverifiedClaims(pub Claims);

impl FromRequestParts<Arc<AppState>> for UnverifiedClaims {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| reject(state, AuthError::MissingBearer))?;

        let claims = state
            .tokens
            .decode_unverified(token)
            .map_err(|e| reject(state, e))?;

        Ok(UnverifiedClaims(claims))
    }
}

/// The user named by a verified token's subject
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| reject(state, AuthError::MissingBearer))?;

        let claims = state.tokens.decode(token).map_err(|e| reject(state, e))?;

        let username = claims
            .sub
            .ok_or_else(|| reject(state, AuthError::invalid_token("missing subject")))?;

        let user = state
            .users
            .find_by_username(&username)
            .await
            .map_err(|e| reject(state, e))?
            .ok_or_else(|| reject(state, AuthError::invalid_token("unknown subject")))?;

        Ok(CurrentUser(user))
    }
}
