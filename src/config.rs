//! Client configuration
//!
//! Settings for talking to the history service, loadable from YAML. The
//! authkey and language can be overridden from the environment.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::authkey`]
pub const AUTHKEY_ENV: &str = "HOYO_AUTHKEY";

/// Environment variable overriding [`ClientConfig::lang`]
pub const LANG_ENV: &str = "HOYO_LANG";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Authkey taken from the in-game history page URL
    #[serde(default)]
    pub authkey: Option<String>,

    /// Language for item and banner names
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Base URL of the wish history API
    #[serde(default = "default_gacha_base_url")]
    pub gacha_base_url: String,

    /// Base URL of the currency transaction API
    #[serde(default = "default_transaction_base_url")]
    pub transaction_base_url: String,

    /// URL of the JSON object mapping transaction reason ids to text
    #[serde(default)]
    pub transaction_reasons_url: Option<String>,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_lang() -> String {
    "en-us".to_string()
}

fn default_gacha_base_url() -> String {
    "https://hk4e-api-os.hoyoverse.com/event/gacha_info/api/".to_string()
}

fn default_transaction_base_url() -> String {
    "https://hk4e-api-os.hoyoverse.com/ysulog/api/".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            authkey: None,
            lang: default_lang(),
            gacha_base_url: default_gacha_base_url(),
            transaction_base_url: default_transaction_base_url(),
            transaction_reasons_url: None,
            http: HttpConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Apply `HOYO_AUTHKEY` / `HOYO_LANG` overrides
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_overrides(
            std::env::var(AUTHKEY_ENV).ok(),
            std::env::var(LANG_ENV).ok(),
        )
    }

    /// Override the authkey and language when given
    #[must_use]
    pub fn apply_overrides(mut self, authkey: Option<String>, lang: Option<String>) -> Self {
        if let Some(authkey) = authkey.filter(|a| !a.is_empty()) {
            self.authkey = Some(authkey);
        }
        if let Some(lang) = lang.filter(|l| !l.is_empty()) {
            self.lang = lang;
        }
        self
    }

    /// The authkey, or an error if none is configured
    pub fn require_authkey(&self) -> Result<&str> {
        self.authkey
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::missing_field("authkey"))
    }

    /// Check the config for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        for (field, url) in [
            ("gacha_base_url", &self.gacha_base_url),
            ("transaction_base_url", &self.transaction_base_url),
        ] {
            if url.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
            url::Url::parse(url)?;
        }
        if let Some(url) = &self.transaction_reasons_url {
            url::Url::parse(url)?;
        }
        if self.lang.trim().is_empty() {
            return Err(Error::missing_field("lang"));
        }
        if self.http.page_size == Some(0) {
            return Err(Error::config("http.page_size must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Token bucket settings, `null` disables rate limiting
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Full-page size override for sources that do not use 20
    #[serde(default)]
    pub page_size: Option<usize>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit: default_rate_limit(),
            page_size: None,
        }
    }
}

impl HttpConfig {
    /// Build the HTTP client config
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            );
        builder = match &self.rate_limit {
            Some(rate_limit) => builder.rate_limit(rate_limit.clone()),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.lang, "en-us");
        assert!(config.authkey.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.http.max_retries, 3);
    }

    #[test]
    fn test_from_yaml_with_defaults() {
        let yaml = r"
authkey: abc
lang: ja-jp
http:
  max_retries: 1
  backoff: linear
  rate_limit: null
";
        let config = ClientConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.authkey.as_deref(), Some("abc"));
        assert_eq!(config.lang, "ja-jp");
        assert_eq!(config.gacha_base_url, default_gacha_base_url());
        assert_eq!(config.http.max_retries, 1);
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert!(config.http.rate_limit.is_none());
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_from_yaml_rejects_bad_url() {
        let err = ClientConfig::from_yaml("gacha_base_url: not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = ClientConfig::from_yaml("gacha_base_url: ''").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_from_yaml_rejects_zero_page_size() {
        let err = ClientConfig::from_yaml("http:\n  page_size: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "authkey: from-file").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.authkey.as_deref(), Some("from-file"));

        let missing = ClientConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(missing, Error::Other(_)));
        assert!(missing
            .to_string()
            .starts_with("Failed to read config /definitely/not/here.yaml: IO error"));
    }

    #[test]
    fn test_apply_overrides() {
        let config = ClientConfig::default()
            .apply_overrides(Some("key".to_string()), Some(String::new()));
        assert_eq!(config.authkey.as_deref(), Some("key"));
        assert_eq!(config.lang, "en-us");
    }

    #[test]
    fn test_require_authkey() {
        let config = ClientConfig::default();
        assert!(matches!(
            config.require_authkey(),
            Err(Error::MissingConfigField { .. })
        ));

        let config = config.apply_overrides(Some("k".to_string()), None);
        assert_eq!(config.require_authkey().unwrap(), "k");
    }

    #[test]
    fn test_http_config_to_client_config() {
        let http = HttpConfig {
            rate_limit: None,
            timeout_secs: 5,
            ..HttpConfig::default()
        };
        let client_config = http.to_client_config();
        assert_eq!(client_config.timeout, Duration::from_secs(5));
        assert!(client_config.rate_limit.is_none());
    }
}
