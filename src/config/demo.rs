use serde::{Deserialize, Serialize};

/// Which demo service a process runs. Each demo is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Demo {
    /// Static API key in a request header
    ApiKey,
    /// Signed bearer token, decoded without signature verification
    Bearer,
    /// OAuth2 password flow with hashed credentials
    #[serde(rename = "oauth2")]
    #[value(name = "oauth2")]
    OAuth2,
    /// Self-hosted documentation assets
    Docs,
}

impl Demo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Demo::ApiKey => "api-key",
            Demo::Bearer => "bearer",
            Demo::OAuth2 => "oauth2",
            Demo::Docs => "docs",
        }
    }

    /// Whether stored credentials are kept as password hashes
    pub fn hashes_passwords(&self) -> bool {
        matches!(self, Demo::OAuth2)
    }
}

impl std::fmt::Display for Demo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api-key" | "api_key" => Ok(Demo::ApiKey),
            "bearer" => Ok(Demo::Bearer),
            "oauth2" => Ok(Demo::OAuth2),
            "docs" => Ok(Demo::Docs),
            _ => Err(format!("invalid demo: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for demo in [Demo::ApiKey, Demo::Bearer, Demo::OAuth2, Demo::Docs] {
            assert_eq!(demo.to_string().parse::<Demo>().unwrap(), demo);
        }
        assert_eq!("api_key".parse::<Demo>().unwrap(), Demo::ApiKey);
        assert!("basic".parse::<Demo>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Demo::OAuth2).unwrap(), "\"oauth2\"");
        assert_eq!(serde_json::to_string(&Demo::ApiKey).unwrap(), "\"api-key\"");
    }
}
