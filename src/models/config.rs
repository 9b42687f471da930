// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and pagination behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.scraper.max_pages == 0 {
            return Err(AppError::validation("scraper.max_pages must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and pagination behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Polite delay between result page requests in milliseconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,

    /// Hard upper bound on result pages per scan
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Retries per page on transient fetch failures
    #[serde(default = "defaults::retry_attempts")]
    pub retry_attempts: u32,

    /// Initial backoff between retries in milliseconds, doubled per attempt
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_delay_ms: defaults::page_delay(),
            max_pages: defaults::max_pages(),
            retry_attempts: defaults::retry_attempts(),
            retry_delay_ms: defaults::retry_delay(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn page_delay() -> u64 {
        1000
    }
    pub fn max_pages() -> u32 {
        10
    }
    pub fn retry_attempts() -> u32 {
        2
    }
    pub fn retry_delay() -> u64 {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scraper.timeout_secs, 20);
        assert_eq!(config.scraper.page_delay_ms, 1000);
        assert_eq!(config.scraper.max_pages, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[scraper]\nmax_pages = 3\n").unwrap();
        assert_eq!(config.scraper.max_pages, 3);
        assert_eq!(config.scraper.timeout_secs, 20);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.scraper.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.scraper.user_agent = "  ".into();
        assert!(config.validate().is_err());
    }
}
