use std::fmt;
use url::Url;

/// Production spot REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Errors raised while assembling a [`BinanceConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required and must not be empty")]
    Missing(&'static str),
    #[error("Invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// API key and secret. Both are redacted from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        let api_secret = api_secret.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::Missing("BINANCE_API_KEY"));
        }
        if api_secret.is_empty() {
            return Err(ConfigError::Missing("BINANCE_API_SECRET"));
        }
        Ok(Self {
            api_key,
            api_secret,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for the Binance REST client.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Base URL without a trailing slash (e.g. "https://testnet.binance.vision").
    pub base_url: String,
    pub credentials: Credentials,
    /// `recvWindow` sent on signed calls that do not carry their own.
    pub recv_window: Option<u64>,
    /// Whole-request HTTP timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl BinanceConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            recv_window: None,
            timeout_secs: 15,
            user_agent: format!("binance-rpc/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Point the client at another deployment (testnet, a mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn with_recv_window(mut self, recv_window: Option<u64>) -> Self {
        self.recv_window = recv_window;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("key", "secret").unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = BinanceConfig::new(credentials());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 15);
        assert!(config.recv_window.is_none());
        assert!(config.user_agent.starts_with("binance-rpc/"));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(ConfigError::Missing("BINANCE_API_KEY"))
        ));
        assert!(matches!(
            Credentials::new("key", "   "),
            Err(ConfigError::Missing("BINANCE_API_SECRET"))
        ));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let creds = Credentials::new("my-api-key", "my-api-secret").unwrap();
        let debug = format!("{:?}", BinanceConfig::new(creds));
        assert!(!debug.contains("my-api-key"));
        assert!(!debug.contains("my-api-secret"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = BinanceConfig::new(credentials())
            .with_base_url("https://testnet.binance.vision/")
            .unwrap();
        assert_eq!(config.base_url, "https://testnet.binance.vision");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(BinanceConfig::new(credentials()).with_base_url("not a url").is_err());
        assert!(BinanceConfig::new(credentials())
            .with_base_url("ftp://example.com")
            .is_err());
    }
}
