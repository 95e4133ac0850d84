//! Client configuration: base URL and per-request timeout.

use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const BASE_URL_ENV: &str = "DESPESAS_API_BASE_URL";
pub const TIMEOUT_MS_ENV: &str = "DESPESAS_API_TIMEOUT_MS";

/// Immutable settings for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read overrides from `DESPESAS_API_BASE_URL` and
    /// `DESPESAS_API_TIMEOUT_MS`; unset variables keep the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Ok(raw) = std::env::var(TIMEOUT_MS_ENV) {
            let millis: u64 = raw.trim().parse().map_err(|e| {
                ApiError::Config(format!("{TIMEOUT_MS_ENV}={raw:?} is not a number: {e}"))
            })?;
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::default()
            .with_base_url("http://10.0.0.2:9000/api")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.base_url, "http://10.0.0.2:9000/api");
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn from_env_without_variables_uses_defaults() {
        temp_env::with_vars_unset([BASE_URL_ENV, TIMEOUT_MS_ENV], || {
            assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());
        });
    }

    #[test]
    fn from_env_reads_overrides() {
        temp_env::with_vars(
            [
                (BASE_URL_ENV, Some("http://api.internal/api")),
                (TIMEOUT_MS_ENV, Some("2500")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.base_url, "http://api.internal/api");
                assert_eq!(config.timeout, Duration::from_millis(2500));
            },
        );
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        temp_env::with_var(TIMEOUT_MS_ENV, Some("ten seconds"), || {
            assert!(matches!(
                ClientConfig::from_env(),
                Err(ApiError::Config(_))
            ));
        });
    }
}
