use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Instant;

use crate::auth::{InMemoryUserStore, TokenService, UserStore};
use crate::config::{Demo, Settings};
use crate::error::{AuthError, Result};

/// Shared application state
pub struct AppState {
    pub demo: Demo,
    pub settings: Settings,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenService,
    pub start_time: Instant,
    openapi: OnceCell<serde_json::Value>,
}

impl AppState {
    /// Build state with the configured in-memory user list
    pub fn new(demo: Demo, settings: Settings) -> Result<Arc<Self>> {
        let users = InMemoryUserStore::from_entries(
            &settings.users,
            settings.auth.lookup,
            demo.hashes_passwords(),
        )?;
        tracing::debug!(demo = %demo, users = users.len(), "user store ready");

        Self::with_user_store(demo, settings, Arc::new(users))
    }

    pub fn with_user_store(
        demo: Demo,
        settings: Settings,
        users: Arc<dyn UserStore>,
    ) -> Result<Arc<Self>> {
        let tokens = TokenService::from_config(&settings.auth)?;

        if demo == Demo::Docs && !settings.docs.static_dir.is_dir() {
            return Err(AuthError::Config(format!(
                "static directory {} does not exist",
                settings.docs.static_dir.display()
            )));
        }

        Ok(Arc::new(Self {
            demo,
            settings,
            users,
            tokens,
            start_time: Instant::now(),
            openapi: OnceCell::new(),
        }))
    }

    /// OpenAPI document for this demo, built on first use and cached.
    /// Concurrent first callers may both build it; one value wins.
    pub fn openapi(&self) -> Result<&serde_json::Value> {
        self.openapi
            .get_or_try_init(|| crate::api::openapi::build(self.demo, &self.settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_demo_requires_static_dir() {
        let mut settings = Settings::default();
        settings.docs.static_dir = "/nonexistent/authdemo/static".into();
        assert!(matches!(
            AppState::new(Demo::Docs, settings.clone()),
            Err(AuthError::Config(_))
        ));

        // Other demos do not serve static files
        assert!(AppState::new(Demo::ApiKey, settings).is_ok());
    }

    #[test]
    fn test_openapi_is_cached() {
        let state = AppState::new(Demo::Bearer, Settings::default()).unwrap();
        let first = state.openapi().unwrap() as *const serde_json::Value;
        let second = state.openapi().unwrap() as *const serde_json::Value;
        assert_eq!(first, second);
    }
}
