//! Persistence medium contract.
//!
//! The save payload is a single JSON string stored under [`SAVE_KEY`]. Runtime
//! layers provide durable backends; [`MemoryStorage`] is the fallback used when
//! none is configured.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{ErrorSeverity, GameError};

/// Key under which the save record is written.
pub const SAVE_KEY: &str = "shadow-pact-save";

/// Minimal string key-value store.
///
/// Implementations take `&self` so one medium can back several stores.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Errors surfaced by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage lock was poisoned")]
    LockPoisoned,

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError for StorageError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidKey(_) => ErrorSeverity::Validation,
            Self::LockPoisoned => ErrorSeverity::Internal,
            Self::Io(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "STORAGE_LOCK_POISONED",
            Self::InvalidKey(_) => "STORAGE_INVALID_KEY",
            Self::Io(_) => "STORAGE_IO",
        }
    }
}

/// In-memory medium. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
