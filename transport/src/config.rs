//! Client configuration from the environment.

use std::time::Duration;

use ecomarket_core::RetryPolicy;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://retos-ia.free.beeceptor.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Where the catalog lives, how long one call may take, and how failed calls
/// are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcoMarketConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for EcoMarketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl EcoMarketConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `ECOMARKET_BASE_URL`, `ECOMARKET_TIMEOUT_SECS` and
    /// `ECOMARKET_MAX_RETRIES`; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("ECOMARKET_BASE_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty("ECOMARKET_BASE_URL"));
            }
            config.base_url = url.to_string();
        }
        if let Some(secs) = lookup("ECOMARKET_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("ECOMARKET_TIMEOUT_SECS", &secs)?);
        }
        if let Some(retries) = lookup("ECOMARKET_MAX_RETRIES") {
            config.retry.max_retries = parse_number("ECOMARKET_MAX_RETRIES", &retries)?;
        }
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}
