//! Authoritative persisted state.
//!
//! This module owns the save record, the store that guards it, and the
//! key-value medium contract used for save/load. Systems clone or query the
//! record but mutate it exclusively through [`StateStore`].
mod record;
mod storage;
mod store;

pub use record::{Location, PlayerStats, QuestProgress, SaveRecord, SaveValidationError, StatKey};
pub use storage::{KeyValueStore, MemoryStorage, SAVE_KEY, StorageError};
pub use store::{InventoryError, PersistError, QuestError, StateStore};
