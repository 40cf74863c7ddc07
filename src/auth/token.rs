use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};

/// Token claims. Issued tokens always carry `exp`; the oauth2 demo adds `sub`.
/// Either may be absent on a token decoded without verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and decodes HMAC-signed JWTs with a single shared secret
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Duration) -> Result<Self> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Config(format!(
                "unsupported signing algorithm {:?}, expected an HMAC algorithm",
                algorithm
            )));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let ttl = Duration::try_minutes(config.access_token_expire_minutes).ok_or_else(|| {
            AuthError::Config(format!(
                "access_token_expire_minutes out of range: {}",
                config.access_token_expire_minutes
            ))
        })?;
        Self::new(config.signing_secret.as_bytes(), config.algorithm, ttl)
    }

    /// Sign a token expiring after the configured lifetime
    pub fn issue(&self, subject: Option<&str>) -> Result<String> {
        self.issue_with_ttl(subject, self.ttl)
    }

    pub fn issue_with_ttl(&self, subject: Option<&str>, ttl: Duration) -> Result<String> {
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenEncoding("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.map(str::to_string),
            exp: Some(exp.timestamp()),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenEncoding(e.to_string()))
    }

    /// Decode with full signature and expiry validation. `exp` must be present.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(self.algorithm);
        self.decode_with(token, &validation)
    }

    /// Decode without checking the signature, audience or issuer.
    ///
    /// Only the payload shape is enforced, plus `exp` when the token carries
    /// one. Any party can mint a token that passes this check.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        self.decode_with(token, &validation)
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::invalid_token(format!("{:?}", e.kind())))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}
