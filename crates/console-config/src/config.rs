//! Configuration management for the console client.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default API base URL (can be overridden at compile time via CONSOLE_API_URL).
pub const DEFAULT_API_URL: &str = match option_env!("CONSOLE_API_URL") {
    Some(url) => url,
    None => "http://localhost:5037/api",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured API base URL is not a valid URL.
    #[error("Invalid API base URL: {0}")]
    InvalidApiUrl(#[from] url::ParseError),
}

/// Result type alias using ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main console client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Base address of the console REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Override configuration values from the process environment.
    ///
    /// Recognized variables: `CONSOLE_API_URL`, `CONSOLE_LOG_LEVEL`.
    pub fn load_from_env(&mut self) {
        if let Some(url) = non_empty_env("CONSOLE_API_URL") {
            self.api_url = url;
        }
        if let Some(level) = non_empty_env("CONSOLE_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Parse and validate the configured API base URL.
    pub fn api_base(&self) -> ConfigResult<Url> {
        let url = Url::parse(&self.api_url)?;
        Ok(url)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_as_url() {
        let config = Config::default();
        assert!(config.api_base().is_ok());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn env_overrides_api_url() {
        let original = std::env::var("CONSOLE_API_URL").ok();
        std::env::set_var("CONSOLE_API_URL", "https://console.example.org/api");

        let config = Config::new();
        assert_eq!(config.api_url, "https://console.example.org/api");

        match original {
            Some(value) => std::env::set_var("CONSOLE_API_URL", value),
            None => std::env::remove_var("CONSOLE_API_URL"),
        }
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let original = std::env::var("CONSOLE_LOG_LEVEL").ok();
        std::env::set_var("CONSOLE_LOG_LEVEL", "   ");

        let mut config = Config::default();
        config.load_from_env();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);

        match original {
            Some(value) => std::env::set_var("CONSOLE_LOG_LEVEL", value),
            None => std::env::remove_var("CONSOLE_LOG_LEVEL"),
        }
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let config = Config {
            log_level: "info".to_string(),
            api_url: "not a url".to_string(),
        };
        assert!(config.api_base().is_err());
    }
}
