//! The Persisted State Store: single owner of the [`SaveRecord`].
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::EconomyConfig;
use crate::error::{ErrorSeverity, GameError};

use super::record::{Location, PlayerStats, QuestProgress, SaveRecord, SaveValidationError, StatKey};
use super::storage::{KeyValueStore, MemoryStorage, SAVE_KEY, StorageError};

/// Canonical mutable record of a playthrough plus the medium it persists to.
///
/// Systems never hold the record itself; they call the accessors below, and
/// [`StateStore::snapshot`] hands out deep copies.
pub struct StateStore {
    record: SaveRecord,
    storage: Arc<dyn KeyValueStore>,
    save_key: String,
    starting_credits: u32,
}

impl StateStore {
    /// Store backed by a private in-memory medium.
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            record: SaveRecord::title(),
            storage,
            save_key: SAVE_KEY.to_owned(),
            starting_credits: EconomyConfig::default().starting_credits,
        }
    }

    /// Uses `storage` when present, otherwise falls back to memory.
    pub fn with_optional_storage(storage: Option<Arc<dyn KeyValueStore>>) -> Self {
        match storage {
            Some(storage) => Self::with_storage(storage),
            None => {
                tracing::warn!("no persistence medium configured, saves stay in memory");
                Self::new()
            }
        }
    }

    pub fn with_save_key(mut self, key: impl Into<String>) -> Self {
        self.save_key = key.into();
        self
    }

    pub fn with_starting_credits(mut self, credits: u32) -> Self {
        self.starting_credits = credits;
        self
    }

    /// Resets to the canonical new-game record.
    pub fn new_game(&mut self) {
        self.record = SaveRecord::new_game(self.starting_credits);
    }

    /// Deep, independent copy of the current record.
    pub fn snapshot(&self) -> SaveRecord {
        self.record.clone()
    }

    /// Read-only view of the current record.
    pub fn record(&self) -> &SaveRecord {
        &self.record
    }

    pub fn location(&self) -> &Location {
        &self.record.location
    }

    pub fn set_location(&mut self, scene: impl Into<String>, entry: impl Into<String>) {
        self.record.location = Location::new(scene, entry);
    }

    pub fn stats(&self) -> PlayerStats {
        self.record.stats
    }

    pub fn stat(&self, key: StatKey) -> f32 {
        self.record.stats.get(key)
    }

    /// Sets a stat verbatim. Callers are responsible for clamping.
    pub fn update_stat(&mut self, key: StatKey, value: f32) {
        self.record.stats.set(key, value);
    }

    pub fn inventory(&self) -> &BTreeMap<String, u32> {
        &self.record.inventory
    }

    pub fn item_count(&self, id: &str) -> u32 {
        self.record.inventory.get(id).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, id: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        let count = self.record.inventory.entry(id.to_owned()).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Removes `amount` of `id`, pruning the entry when it reaches zero.
    ///
    /// Fails without touching the inventory when fewer than `amount` are held.
    pub fn remove_item(&mut self, id: &str, amount: u32) -> Result<(), InventoryError> {
        let available = self.item_count(id);
        if available < amount {
            return Err(InventoryError::Insufficient {
                item: id.to_owned(),
                requested: amount,
                available,
            });
        }
        let remaining = available - amount;
        if remaining == 0 {
            self.record.inventory.remove(id);
        } else {
            self.record.inventory.insert(id.to_owned(), remaining);
        }
        Ok(())
    }

    pub fn has_item(&self, id: &str, amount: u32) -> bool {
        self.item_count(id) >= amount
    }

    pub fn quests(&self) -> &[QuestProgress] {
        &self.record.quests
    }

    pub fn quest(&self, id: &str) -> Option<&QuestProgress> {
        self.record.quest(id)
    }

    /// Returns existing progress for `id`, or registers fresh progress with
    /// `objective_count` outstanding objectives.
    pub fn upsert_quest(&mut self, id: &str, objective_count: usize) -> &QuestProgress {
        let index = match self.record.quests.iter().position(|quest| quest.id == id) {
            Some(index) => index,
            None => {
                self.record
                    .quests
                    .push(QuestProgress::new(id, objective_count));
                self.record.quests.len() - 1
            }
        };
        &self.record.quests[index]
    }

    /// Marks one objective done and recomputes completion.
    ///
    /// Returns `Ok(true)` if the objective was newly completed.
    pub fn complete_objective(&mut self, id: &str, index: usize) -> Result<bool, QuestError> {
        let quest = self
            .record
            .quests
            .iter_mut()
            .find(|quest| quest.id == id)
            .ok_or_else(|| QuestError::NotActive(id.to_owned()))?;
        let total = quest.objectives.len();
        let slot = quest
            .objectives
            .get_mut(index)
            .ok_or_else(|| QuestError::ObjectiveOutOfRange {
                quest: id.to_owned(),
                index,
                total,
            })?;
        let changed = !*slot;
        *slot = true;
        quest.recompute();
        Ok(changed)
    }

    pub fn set_flag(&mut self, flag: &str, value: bool) {
        self.record.flags.insert(flag.to_owned(), value);
    }

    /// Unset flags read as `false`.
    pub fn get_flag(&self, flag: &str) -> bool {
        self.record.flags.get(flag).copied().unwrap_or(false)
    }

    pub fn credits(&self) -> u32 {
        self.record.credits
    }

    pub fn set_credits(&mut self, credits: u32) {
        self.record.credits = credits;
    }

    /// Serializes the full record under the save key.
    pub fn save(&self) -> Result<(), PersistError> {
        let payload = serde_json::to_string(&self.record).map_err(PersistError::Encode)?;
        self.storage.set_item(&self.save_key, &payload)?;
        tracing::debug!(key = %self.save_key, bytes = payload.len(), "saved record");
        Ok(())
    }

    /// Restores the record from the medium.
    ///
    /// Returns `Ok(None)` when nothing was saved. Decoding or validation
    /// failures leave the current record untouched.
    pub fn load(&mut self) -> Result<Option<SaveRecord>, PersistError> {
        let Some(record) = self.read_saved()? else {
            return Ok(None);
        };
        self.restore(record);
        Ok(Some(self.snapshot()))
    }

    /// Decodes and validates the saved record without committing it.
    pub fn read_saved(&self) -> Result<Option<SaveRecord>, PersistError> {
        let Some(payload) = self.storage.get_item(&self.save_key)? else {
            tracing::debug!(key = %self.save_key, "no saved record");
            return Ok(None);
        };
        let record: SaveRecord = serde_json::from_str(&payload).map_err(PersistError::Decode)?;
        record.validate()?;
        tracing::debug!(key = %self.save_key, bytes = payload.len(), "read saved record");
        Ok(Some(record))
    }

    /// Replaces the live record wholesale.
    pub fn restore(&mut self, record: SaveRecord) {
        self.record = record;
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("record", &self.record)
            .field("save_key", &self.save_key)
            .finish_non_exhaustive()
    }
}

/// Inventory operation rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("need {requested} of '{item}' but only {available} held")]
    Insufficient {
        item: String,
        requested: u32,
        available: u32,
    },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "INVENTORY_INSUFFICIENT"
    }
}

/// Quest operation rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuestError {
    #[error("quest '{0}' has no definition")]
    Unknown(String),

    #[error("quest '{0}' has not been activated")]
    NotActive(String),

    #[error("objective {index} out of range for quest '{quest}' with {total} objectives")]
    ObjectiveOutOfRange {
        quest: String,
        index: usize,
        total: usize,
    },
}

impl GameError for QuestError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unknown(_) | Self::NotActive(_) => ErrorSeverity::Recoverable,
            Self::ObjectiveOutOfRange { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "QUEST_UNKNOWN",
            Self::NotActive(_) => "QUEST_NOT_ACTIVE",
            Self::ObjectiveOutOfRange { .. } => "QUEST_OBJECTIVE_OUT_OF_RANGE",
        }
    }
}

/// Save or load failure.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode save record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("saved record is malformed: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("saved record failed validation: {0}")]
    Invalid(#[from] SaveValidationError),
}

impl GameError for PersistError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Storage(err) => err.severity(),
            Self::Encode(_) => ErrorSeverity::Internal,
            Self::Decode(_) | Self::Invalid(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(err) => err.error_code(),
            Self::Encode(_) => "PERSIST_ENCODE",
            Self::Decode(_) => "PERSIST_DECODE",
            Self::Invalid(err) => err.error_code(),
        }
    }
}
