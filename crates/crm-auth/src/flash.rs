//! Session-scoped notice shown on the next login screen.
//!
//! A forced logout discards in-memory state, so the reason is parked here
//! and picked up once by whoever renders the login prompt next.

use std::sync::Arc;

use crate::error::AuthError;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Storage key for the pending login notice.
pub const LOGIN_ERROR_KEY: &str = "login_error";

#[derive(Debug, Clone)]
pub struct FlashStore {
    storage: Arc<dyn KeyValueStore>,
}

impl FlashStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn on_disk(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(dir)))
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the notice cannot be written.
    pub fn store_login_error(&self, message: &str) -> Result<(), AuthError> {
        self.storage.set(LOGIN_ERROR_KEY, message)
    }

    #[must_use]
    pub fn login_error(&self) -> Option<String> {
        self.storage.get(LOGIN_ERROR_KEY).unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to read login notice");
            None
        })
    }

    /// Read the notice and clear it.
    #[must_use]
    pub fn take_login_error(&self) -> Option<String> {
        let message = self.login_error()?;
        if let Err(error) = self.clear_login_error() {
            tracing::warn!(%error, "failed to clear login notice");
        }
        Some(message)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the notice cannot be removed.
    pub fn clear_login_error(&self) -> Result<(), AuthError> {
        self.storage.remove(LOGIN_ERROR_KEY)
    }
}
