use anyhow::{Result, bail};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "default_users")]
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            auth: AuthConfig::default(),
            users: default_users(),
            docs: DocsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_listen() -> String { "127.0.0.1:8000".to_string() }
fn default_body_limit() -> usize { 64 * 1024 }

/// Secrets default to fixed local-only values. Override them for anything
/// that leaves the developer machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    #[serde(default = "default_secret")]
    pub api_key: String,
    #[serde(default = "default_secret")]
    pub signing_secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default = "default_expire_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default)]
    pub lookup: LookupMode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key_header: default_api_key_header(),
            api_key: default_secret(),
            signing_secret: default_secret(),
            algorithm: default_algorithm(),
            access_token_expire_minutes: default_expire_minutes(),
            lookup: LookupMode::default(),
        }
    }
}

fn default_api_key_header() -> String { "Authorization".to_string() }
fn default_secret() -> String { "api_secret_key".to_string() }
fn default_algorithm() -> Algorithm { Algorithm::HS256 }
fn default_expire_minutes() -> i64 { 15 }

/// Ten years
const MAX_EXPIRE_MINUTES: i64 = 10 * 365 * 24 * 60;

/// How a submitted username is matched against stored records.
///
/// `Substring` returns the first record whose username contains the submitted
/// value, so `"on"` resolves to `"one"`. `Exact` requires equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    #[default]
    Substring,
    Exact,
}

/// A configured user. The oauth2 demo hashes `password` at startup unless a
/// precomputed `password_hash` (Argon2 PHC string) is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl UserEntry {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: Some(password.to_string()),
            password_hash: None,
        }
    }
}

fn default_users() -> Vec<UserEntry> {
    vec![
        UserEntry::new("one", "secret_one"),
        UserEntry::new("two", "secret_two"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_docs_title")]
    pub title: String,
    #[serde(default = "default_docs_version")]
    pub version: String,
    #[serde(default = "default_docs_description")]
    pub description: String,
    /// Directory served under `/static` by the docs demo
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_logo_url")]
    pub logo_url: Option<String>,
    #[serde(default = "default_swagger_cdn")]
    pub swagger_cdn: String,
    #[serde(default = "default_redoc_cdn")]
    pub redoc_cdn: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_docs_title(),
            version: default_docs_version(),
            description: default_docs_description(),
            static_dir: default_static_dir(),
            logo_url: default_logo_url(),
            swagger_cdn: default_swagger_cdn(),
            redoc_cdn: default_redoc_cdn(),
        }
    }
}

fn default_docs_title() -> String { "My API".to_string() }
fn default_docs_version() -> String { "1.0.0".to_string() }
fn default_docs_description() -> String { "This custom SWAGGER documentation".to_string() }
fn default_static_dir() -> PathBuf { PathBuf::from("resources/static") }
fn default_logo_url() -> Option<String> { Some("/static/flaticon_cache_icon.png".to_string()) }
fn default_swagger_cdn() -> String { "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5".to_string() }
fn default_redoc_cdn() -> String { "https://cdn.jsdelivr.net/npm/redoc@2/bundles".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_format() -> LogFormat { LogFormat::Pretty }
fn default_log_level() -> String { "info".to_string() }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` when given, otherwise fall back to the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.api_key.is_empty() {
            bail!("auth.api_key must not be empty");
        }
        if self.auth.signing_secret.is_empty() {
            bail!("auth.signing_secret must not be empty");
        }
        let minutes = self.auth.access_token_expire_minutes;
        if minutes <= 0 {
            bail!("auth.access_token_expire_minutes must be positive, got {}", minutes);
        }
        if minutes > MAX_EXPIRE_MINUTES {
            bail!(
                "auth.access_token_expire_minutes must be at most {}, got {}",
                MAX_EXPIRE_MINUTES,
                minutes
            );
        }
        for user in &self.users {
            if user.username.is_empty() {
                bail!("users: username must not be empty");
            }
            if user.password.is_none() && user.password_hash.is_none() {
                bail!("users: {} needs password or password_hash", user.username);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_constants() {
        let settings = Settings::default();
        assert_eq!(settings.auth.api_key, "api_secret_key");
        assert_eq!(settings.auth.signing_secret, "api_secret_key");
        assert_eq!(settings.auth.algorithm, Algorithm::HS256);
        assert_eq!(settings.auth.access_token_expire_minutes, 15);
        assert_eq!(settings.auth.lookup, LookupMode::Substring);
        assert_eq!(settings.users.len(), 2);
        assert_eq!(settings.users[0].username, "one");
        assert_eq!(settings.http.listen, "127.0.0.1:8000");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
auth:
  signing_secret: "another-secret"
  lookup: exact
docs:
  title: "Internal API"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.auth.signing_secret, "another-secret");
        assert_eq!(settings.auth.api_key, "api_secret_key");
        assert_eq!(settings.auth.lookup, LookupMode::Exact);
        assert_eq!(settings.docs.title, "Internal API");
        assert_eq!(settings.docs.version, "1.0.0");
        assert_eq!(settings.users.len(), 2);
    }

    #[test]
    fn test_algorithm_from_yaml() {
        let yaml = "auth:\n  algorithm: HS512\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.auth.algorithm, Algorithm::HS512);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.auth.access_token_expire_minutes = 0;
        assert!(settings.validate().is_err());

        // Far beyond any representable expiry timestamp
        let mut settings = Settings::default();
        settings.auth.access_token_expire_minutes = 200_000_000_000;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.auth.access_token_expire_minutes = MAX_EXPIRE_MINUTES;
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.users.push(UserEntry {
            username: "three".to_string(),
            password: None,
            password_hash: None,
        });
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authdemo.yaml");
        std::fs::write(&path, "http:\n  listen: \"0.0.0.0:9000\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.http.listen, "0.0.0.0:9000");
        assert!(Settings::load(dir.path().join("missing.yaml")).is_err());
    }
}
