//! The persisted playthrough record and its invariants.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::config::EconomyConfig;
use crate::error::{ErrorSeverity, GameError};

/// Scene and entry point the playthrough resumes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub scene: String,
    pub entry: String,
}

impl Location {
    pub fn new(scene: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            entry: entry.into(),
        }
    }
}

/// Names of the numeric stats, used by [`super::StateStore::update_stat`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StatKey {
    Hp,
    Stamina,
    Debt,
    DebtCap,
    LanternFuel,
}

/// Player resources. Values are fractional because drains scale with frame time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub hp: f32,
    pub stamina: f32,
    pub debt: f32,
    pub debt_cap: f32,
    pub lantern_fuel: f32,
}

impl PlayerStats {
    pub const fn get(&self, key: StatKey) -> f32 {
        match key {
            StatKey::Hp => self.hp,
            StatKey::Stamina => self.stamina,
            StatKey::Debt => self.debt,
            StatKey::DebtCap => self.debt_cap,
            StatKey::LanternFuel => self.lantern_fuel,
        }
    }

    pub fn set(&mut self, key: StatKey, value: f32) {
        let slot = match key {
            StatKey::Hp => &mut self.hp,
            StatKey::Stamina => &mut self.stamina,
            StatKey::Debt => &mut self.debt,
            StatKey::DebtCap => &mut self.debt_cap,
            StatKey::LanternFuel => &mut self.lantern_fuel,
        };
        *slot = value;
    }

    /// Debt as a fraction of the cap; the cap is treated as at least 1.
    pub fn debt_ratio(&self) -> f32 {
        self.debt / self.debt_cap.max(1.0)
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hp: 100.0,
            stamina: 100.0,
            debt: 0.0,
            debt_cap: 100.0,
            lantern_fuel: 100.0,
        }
    }
}

/// Completion state of one quest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub id: String,
    pub objectives: Vec<bool>,
    pub completed: bool,
}

impl QuestProgress {
    /// Fresh progress with every objective outstanding.
    pub fn new(id: impl Into<String>, objective_count: usize) -> Self {
        let mut progress = Self {
            id: id.into(),
            objectives: vec![false; objective_count],
            completed: false,
        };
        progress.recompute();
        progress
    }

    pub fn completed_count(&self) -> usize {
        self.objectives.iter().filter(|done| **done).count()
    }

    pub fn total(&self) -> usize {
        self.objectives.len()
    }

    pub(crate) fn recompute(&mut self) {
        self.completed = self.objectives.iter().all(|done| *done);
    }
}

/// Canonical record of a playthrough.
///
/// Owned exclusively by [`super::StateStore`]; everything else reads copies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub location: Location,
    pub stats: PlayerStats,
    pub inventory: BTreeMap<String, u32>,
    pub quests: Vec<QuestProgress>,
    pub flags: BTreeMap<String, bool>,
    /// Shop currency. Older saves without the field start with the default purse.
    #[serde(default = "default_credits")]
    pub credits: u32,
}

fn default_credits() -> u32 {
    EconomyConfig::default().starting_credits
}

fn starting_inventory() -> BTreeMap<String, u32> {
    BTreeMap::from([("lantern".to_owned(), 1), ("fuel".to_owned(), 2)])
}

impl SaveRecord {
    /// Record held before any playthrough starts.
    pub fn title() -> Self {
        Self::at(Location::new("TitleScene", "start"), default_credits())
    }

    /// Canonical starting record of a new playthrough.
    pub fn new_game(starting_credits: u32) -> Self {
        Self::at(Location::new("OverworldScene", "town"), starting_credits)
    }

    fn at(location: Location, credits: u32) -> Self {
        Self {
            location,
            stats: PlayerStats::default(),
            inventory: starting_inventory(),
            quests: Vec::new(),
            flags: BTreeMap::new(),
            credits,
        }
    }

    pub fn quest(&self, id: &str) -> Option<&QuestProgress> {
        self.quests.iter().find(|quest| quest.id == id)
    }

    /// Checks the record invariants. Used on every load.
    pub fn validate(&self) -> Result<(), SaveValidationError> {
        for key in StatKey::iter() {
            let value = self.stats.get(key);
            if !value.is_finite() {
                return Err(SaveValidationError::NonFinite(key));
            }
            if value < 0.0 {
                return Err(SaveValidationError::NegativeStat { stat: key, value });
            }
        }
        if self.stats.debt_cap <= 0.0 {
            return Err(SaveValidationError::NonPositiveDebtCap(self.stats.debt_cap));
        }
        if self.stats.debt > self.stats.debt_cap {
            return Err(SaveValidationError::DebtOverCap {
                debt: self.stats.debt,
                cap: self.stats.debt_cap,
            });
        }
        if let Some((id, _)) = self.inventory.iter().find(|(_, count)| **count == 0) {
            return Err(SaveValidationError::EmptyInventoryEntry(id.clone()));
        }
        for (index, quest) in self.quests.iter().enumerate() {
            if self.quests[..index].iter().any(|other| other.id == quest.id) {
                return Err(SaveValidationError::DuplicateQuest(quest.id.clone()));
            }
            if quest.completed != quest.objectives.iter().all(|done| *done) {
                return Err(SaveValidationError::CompletionMismatch(quest.id.clone()));
            }
        }
        Ok(())
    }
}

/// Reasons a decoded record is rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SaveValidationError {
    #[error("stat {0} is not a finite number")]
    NonFinite(StatKey),

    #[error("stat {stat} is negative ({value})")]
    NegativeStat { stat: StatKey, value: f32 },

    #[error("debt cap must be positive, found {0}")]
    NonPositiveDebtCap(f32),

    #[error("debt {debt} exceeds debt cap {cap}")]
    DebtOverCap { debt: f32, cap: f32 },

    #[error("inventory entry '{0}' has a zero count")]
    EmptyInventoryEntry(String),

    #[error("quest '{0}' appears more than once")]
    DuplicateQuest(String),

    #[error("quest '{0}' completion flag disagrees with its objectives")]
    CompletionMismatch(String),
}

impl GameError for SaveValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonFinite(_) => "SAVE_NON_FINITE",
            Self::NegativeStat { .. } => "SAVE_NEGATIVE_STAT",
            Self::NonPositiveDebtCap(_) => "SAVE_DEBT_CAP",
            Self::DebtOverCap { .. } => "SAVE_DEBT_OVER_CAP",
            Self::EmptyInventoryEntry(_) => "SAVE_EMPTY_INVENTORY_ENTRY",
            Self::DuplicateQuest(_) => "SAVE_DUPLICATE_QUEST",
            Self::CompletionMismatch(_) => "SAVE_COMPLETION_MISMATCH",
        }
    }
}
