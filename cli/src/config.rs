//! Runtime configuration.
//!
//! Values come from the environment (the binary loads `.env` into it at
//! startup), then command-line flags override them:
//!
//! | Variable                   | Default                 |
//! |----------------------------|-------------------------|
//! | `MOMENTUM_BASE_URL`        | `http://localhost:8000` |
//! | `MOMENTUM_CSRF_TOKEN`      | none                    |
//! | `MOMENTUM_TIMEOUT_SECS`    | `30`                    |
//! | `MOMENTUM_RELOAD_DELAY_MS` | `1500`                  |

use std::env;
use std::time::Duration;

use momentum_wizard::{ControllerConfig, DEFAULT_RELOAD_DELAY};

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "MOMENTUM_BASE_URL";
pub const CSRF_TOKEN_VAR: &str = "MOMENTUM_CSRF_TOKEN";
pub const TIMEOUT_VAR: &str = "MOMENTUM_TIMEOUT_SECS";
pub const RELOAD_DELAY_VAR: &str = "MOMENTUM_RELOAD_DELAY_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Server root, without trailing slash.
    pub base_url: String,
    /// Fallback CSRF token when the server sets no `csrftoken` cookie.
    pub csrf_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause between a successful submission and the reload.
    pub reload_delay: Duration,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            timeout: DEFAULT_TIMEOUT,
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }
}

impl CliConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup(BASE_URL_VAR)) {
            config.base_url = normalize_base_url(&url)?;
        }
        config.csrf_token = non_empty(lookup(CSRF_TOKEN_VAR));
        if let Some(secs) = non_empty(lookup(TIMEOUT_VAR)) {
            config.timeout = Duration::from_secs(parse_number(TIMEOUT_VAR, &secs)?);
        }
        if let Some(millis) = non_empty(lookup(RELOAD_DELAY_VAR)) {
            config.reload_delay = Duration::from_millis(parse_number(RELOAD_DELAY_VAR, &millis)?);
        }

        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        csrf_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self.base_url = normalize_base_url(&url)?;
        }
        if csrf_token.is_some() {
            self.csrf_token = csrf_token;
        }
        Ok(self)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            reload_delay: self.reload_delay,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    match reqwest::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidBaseUrl(url.to_string())),
    }
}
