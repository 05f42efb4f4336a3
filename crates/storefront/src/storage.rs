//! JSON snapshot storage for the cart and session.
//!
//! Each key maps to a single `<key>.json` file inside the configured data
//! directory. Writes go through a temporary file and an atomic rename so a
//! crash mid-write never leaves a truncated snapshot behind. Reads treat a
//! missing or unreadable file as "no snapshot": corrupt state is logged and
//! discarded rather than surfaced to the user.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys for the snapshots the storefront persists.
pub mod keys {
    /// Cart snapshot: a JSON array of line items.
    pub const CART: &str = "cart";
    /// Signed-in user snapshot.
    pub const SESSION: &str = "session";
}

/// Errors that can occur while persisting a snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed key/value store for JSON snapshots.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Open the store, creating the data directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Directory holding the snapshot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load a snapshot, returning `None` if it is absent or unreadable.
    ///
    /// A snapshot that exists but fails to parse is treated the same as a
    /// missing one, so a corrupt file degrades to the empty state instead of
    /// taking the storefront down.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "Failed to read snapshot");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "Corrupt snapshot, treating as empty");
                None
            }
        }
    }

    /// Persist a snapshot, replacing any previous one for the same key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the filesystem write fails.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Delete a snapshot. Removing a key that was never saved is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file exists but cannot be removed.
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
