//! Client configuration.
//!
//! Loaded from environment variables (a `.env` file is honored by the CLI):
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CRM_API_URL` | `http://localhost:8080/api` |
//! | `CRM_API_KEY` | unset |
//! | `CRM_API_TIMEOUT` | `30` seconds |
//! | `CRM_PAGE_LIMIT` | `50` |

use std::env;
use thiserror::Error;
use tracing::debug;

use crm_filter_core::defaults::{API_TIMEOUT_SECS, API_URL, PAGE_LIMIT, PAGE_LIMIT_MAX};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for crm_filter_core::Error {
    fn from(e: ConfigError) -> Self {
        crm_filter_core::Error::Config(e.to_string())
    }
}

/// Connection settings for the remote CRM API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Bearer token (optional for local deployments).
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Page size the CLI requests when `--limit` is omitted.
    pub default_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_URL.to_string(),
            api_key: None,
            timeout_seconds: API_TIMEOUT_SECS,
            default_limit: PAGE_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// Unparseable numbers are errors rather than silently defaulted.
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self {
            base_url: env::var("CRM_API_URL").unwrap_or_else(|_| API_URL.to_string()),
            api_key: env::var("CRM_API_KEY").ok().filter(|k| !k.is_empty()),
            timeout_seconds: parse_var("CRM_API_TIMEOUT", API_TIMEOUT_SECS)?,
            default_limit: parse_var("CRM_PAGE_LIMIT", PAGE_LIMIT)?,
        };
        debug!(base_url = %config.base_url, "Loaded client config from environment");
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "timeout must be at least 1 second".to_string(),
            ));
        }

        if self.default_limit == 0 || self.default_limit > PAGE_LIMIT_MAX {
            return Err(ConfigError::Validation(format!(
                "default page limit must be between 1 and {}, got: {}",
                PAGE_LIMIT_MAX, self.default_limit
            )));
        }

        Ok(())
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> ConfigResult<T> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        _ => Ok(default),
    }
}
