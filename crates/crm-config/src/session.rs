//! Client-side session storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const APP_DIR: &str = "crm";

fn default_login_route() -> String {
    "/login".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Directory for the persistent credential and user record.
    /// Defaults to `<config dir>/crm/session`.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Directory for session-scoped values such as the pending login notice.
    /// Defaults to `<runtime dir or temp dir>/crm`.
    #[serde(default)]
    pub scoped_dir: Option<PathBuf>,

    /// Route handed to the navigator when a 401 forces a logout.
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: None,
            scoped_dir: None,
            login_route: default_login_route(),
        }
    }
}

impl SessionConfig {
    /// Resolved persistent session directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `session.dir` is unset and the
    /// platform has no config directory.
    pub fn resolved_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("session"))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "session.dir".into(),
                reason: "no config directory on this platform; set CRM_SESSION__DIR".into(),
            })
    }

    /// Resolved session-scoped directory. The runtime dir is wiped on
    /// logout/reboot, which is the closest match to a browser tab's lifetime.
    #[must_use]
    pub fn resolved_scoped_dir(&self) -> PathBuf {
        self.scoped_dir.clone().unwrap_or_else(|| {
            dirs::runtime_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the login route is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.login_route.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.login_route".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
