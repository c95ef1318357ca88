//! Key-value backends for client-side session data.
//!
//! [`FileStore`] persists one file per key with owner-only permissions, the
//! same layout the CLI uses for credentials. [`MemoryStore`] keeps values in
//! process and backs tests and embedders that manage persistence themselves.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::AuthError;

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), AuthError>;
}

/// Directory-backed store: each key is a file named after the key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AuthError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'));
        if !valid {
            return Err(AuthError::Storage(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(key))
    }

    /// Create the directory if needed. Only a directory created here is
    /// restricted to 0700; an existing one keeps its permissions.
    fn ensure_dir(&self) -> Result<(), AuthError> {
        if self.dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)
            .map_err(|e| AuthError::Storage(format!("mkdir {}: {e}", self.dir.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", self.dir.display());
            }
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::Storage(format!("read {}: {e}", path.display()))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let path = self.path_for(key)?;
        self.ensure_dir()?;
        fs::write(&path, value)
            .map_err(|e| AuthError::Storage(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .map_err(|e| AuthError::Storage(format!("chmod {}: {e}", path.display())))?;
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(format!(
                "failed to delete {}: {e}",
                path.display()
            ))),
        }
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_store_set_get_remove_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileStore::new(tmp.path().join("session"));

        assert_eq!(store.get("token").expect("get"), None);
        store.set("token", "T1").expect("set");
        assert_eq!(store.get("token").expect("get").as_deref(), Some("T1"));

        store.remove("token").expect("remove");
        assert_eq!(store.get("token").expect("get"), None);
        assert!(!tmp.path().join("session").join("token").exists());
    }

    #[test]
    fn file_store_remove_missing_key_is_ok() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileStore::new(tmp.path());
        store.remove("never-set").expect("remove");
    }

    #[test]
    fn file_store_ignores_whitespace_only_content() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        std::fs::write(tmp.path().join("token"), "   \n  ").expect("write");
        let store = FileStore::new(tmp.path());
        assert_eq!(store.get("token").expect("get"), None);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileStore::new(tmp.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn file_store_writes_owner_only_files() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let dir = tmp.path().join("session");
        let store = FileStore::new(&dir);
        store.set("token", "T1").expect("set");

        let file_mode = std::fs::metadata(dir.join("token"))
            .expect("metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(file_mode, 0o600, "credential file should be 0600");

        let dir_mode = std::fs::metadata(&dir)
            .expect("metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700, "session dir should be 0700");
    }

    #[cfg(unix)]
    #[test]
    fn file_store_leaves_existing_dir_permissions_alone() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let dir = tmp.path().join("shared");
        std::fs::create_dir(&dir).expect("mkdir");
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).expect("chmod");

        FileStore::new(&dir).set("token", "T1").expect("set");

        let dir_mode = std::fs::metadata(&dir)
            .expect("metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o755);
    }

    #[test]
    fn memory_store_behaves_like_a_map() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1").expect("set");
        store.set("a", "2").expect("overwrite");
        assert_eq!(store.get("a").expect("get").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
        store.remove("a").expect("remove");
        store.remove("a").expect("remove twice");
        assert!(store.is_empty());
    }
}
