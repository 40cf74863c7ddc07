use crate::error::{AuthError, Result};

/// Compare a presented API key against the configured one.
///
/// Plain equality: the key is not hashed and the comparison is not
/// constant-time.
pub fn check_api_key(expected: &str, provided: &str) -> Result<()> {
    if provided == expected {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_api_key() {
        assert!(check_api_key("api_secret_key", "api_secret_key").is_ok());
        assert!(matches!(
            check_api_key("api_secret_key", "api_secret_ke"),
            Err(AuthError::InvalidApiKey)
        ));
        assert!(check_api_key("api_secret_key", "").is_err());
        assert!(check_api_key("api_secret_key", "API_SECRET_KEY").is_err());
    }
}
