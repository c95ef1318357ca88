//! # crm-config
//!
//! Layered configuration loading for the CRM client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CRM_*` prefix, `__` as separator)
//! 2. Project-level `.crm/config.toml`
//! 3. User-level `~/.config/crm/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CRM_API__BASE_URL` -> `api.base_url`,
//! `CRM_SESSION__DIR` -> `session.dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use crm_config::CrmConfig;
//!
//! let config = CrmConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.api.normalized_base_url());
//! ```

mod api;
mod error;
mod session;

pub use api::{ApiConfig, DEFAULT_BASE_URL};
pub use error::ConfigError;
pub use session::SessionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "CRM_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CrmConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl CrmConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".crm/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.session.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("crm").join("config.toml"))
    }
}
