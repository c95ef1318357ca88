//! Backend API configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Local development backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Unset keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Base URL without trailing slashes.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Check the base URL carries an HTTP scheme and the timeout is non-zero.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.normalized_base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: format!("'{url}' must start with http:// or https://"),
            });
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert!(config.timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ApiConfig {
            base_url: "https://crm.example.com/api//".into(),
            ..Default::default()
        };
        assert_eq!(config.normalized_base_url(), "https://crm.example.com/api");
    }

    #[test]
    fn rejects_url_without_scheme() {
        let config = ApiConfig {
            base_url: "localhost:8000/api".into(),
            ..Default::default()
        };
        let err = config.validate().expect_err("should fail");
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ApiConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
