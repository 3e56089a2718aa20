//! File-based key-value storage for save payloads.

use std::fs;
use std::path::{Path, PathBuf};

use shadow_core::{KeyValueStore, StorageError};

use crate::repository::{RepositoryError, Result};

/// Directory-backed implementation of [`KeyValueStore`].
///
/// Each key is stored as `{key}.json` under the base directory. Writes go to
/// a temporary file first and are renamed into place, so a crash mid-write
/// leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `base_dir`, creating the directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Storage in the platform data directory.
    ///
    /// - Linux: `~/.local/share/shadow-pact/saves`
    /// - macOS: `~/Library/Application Support/shadow-pact/saves`
    /// - Windows: `%APPDATA%\shadow-pact\saves`
    pub fn in_data_dir() -> Result<Self> {
        let dir = directories::ProjectDirs::from("", "", "shadow-pact")
            .map(|dirs| dirs.data_dir().join("saves"))
            .ok_or(RepositoryError::NoDataDir)?;
        Self::new(dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Removes `key` if present.
    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted {} at {}", key, path.display());
        }
        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.key_path(key).is_ok_and(|path| path.exists())
    }

    /// Keys may only contain ASCII letters, digits, `-` and `_`, so they can
    /// never escape the base directory.
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::InvalidKey(key.to_owned()));
        }
        Ok(self.base_dir.join(format!("{}.json", key)))
    }
}

impl From<RepositoryError> for StorageError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Io(err) => StorageError::Io(err),
            RepositoryError::InvalidKey(key) => StorageError::InvalidKey(key),
            RepositoryError::NoDataDir => StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no data directory",
            )),
        }
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)?;
        tracing::debug!(
            "Loaded {} ({} bytes) from {}",
            key,
            value.len(),
            path.display()
        );
        Ok(Some(value))
    }

    fn set_item(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        let path = self.key_path(key)?;
        let temp_path = path.with_extension("json.tmp");

        // Write to temp file
        fs::write(&temp_path, value)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            "Saved {} ({} bytes) to {}",
            key,
            value.len(),
            path.display()
        );
        Ok(())
    }
}
