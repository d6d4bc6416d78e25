use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_TOKEN_URL,
};

/// ================================
/// Provider-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProviderSettings {
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// upper bound for the single token request
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    /// subtracted from the server-declared lifetime
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
            safety_margin_seconds: default_safety_margin_seconds(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ProviderSettings {
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_owned()
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_safety_margin_seconds() -> u64 {
    DEFAULT_SAFETY_MARGIN_SECS
}

fn default_log_level() -> String {
    "info".to_owned()
}
