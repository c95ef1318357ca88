//! Persistent session: the bearer credential and the cached user record.
//!
//! No expiry is tracked locally. An expired credential is only discovered
//! when the backend answers 401, at which point the response interceptor
//! clears both keys.

use std::path::PathBuf;
use std::sync::Arc;

use crm_core::User;

use crate::error::AuthError;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Storage key for the bearer credential.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON-serialized user record.
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn on_disk(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(dir)))
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` for an empty credential or a write failure.
    pub fn set_credential(&self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Storage(
                "refusing to store an empty credential".into(),
            ));
        }
        self.storage.set(TOKEN_KEY, token)
    }

    /// Stored credential, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credential exists but cannot be read.
    pub fn try_credential(&self) -> Result<Option<String>, AuthError> {
        Ok(self
            .storage
            .get(TOKEN_KEY)?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Stored credential, if any. Read failures count as absent; use
    /// [`Self::try_credential`] where that must not be hidden.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.try_credential().unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to read stored credential");
            None
        })
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the record cannot be encoded or written.
    pub fn set_user(&self, user: &User) -> Result<(), AuthError> {
        let json = serde_json::to_string(user)
            .map_err(|e| AuthError::Storage(format!("encode user record: {e}")))?;
        self.storage.set(USER_KEY, &json)
    }

    /// Cached user record. Missing, unreadable or corrupt records count as absent.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(error) => {
                tracing::warn!(%error, "failed to read cached user record");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!(%error, "cached user record is corrupt; ignoring it");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the record cannot be removed.
    pub fn clear_user(&self) -> Result<(), AuthError> {
        self.storage.remove(USER_KEY)
    }

    /// Remove the credential and the user record.
    ///
    /// Both removals are attempted even if the first one fails.
    ///
    /// # Errors
    ///
    /// Returns the first `AuthError::Storage` encountered.
    pub fn clear(&self) -> Result<(), AuthError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token.and(user)
    }

    /// Presence check only: no signature or expiry validation.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }
}
