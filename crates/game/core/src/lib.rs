//! Deterministic simulation rules for the light/shadow action-RPG.
//!
//! `shadow-core` defines the canonical gameplay rules (light exposure, stamina,
//! shadow debt, combat, quests, dialogue, economy) and the persisted player
//! record. Presentation layers feed an [`InputSnapshot`] into
//! [`engine::Simulation::step`] once per frame and render the returned state
//! and [`GameEvent`]s. All mutation of the save record flows through
//! [`state::StateStore`].
pub mod actor;
pub mod combat;
pub mod common;
pub mod config;
pub mod debt;
pub mod dialogue;
pub mod economy;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod input;
pub mod light;
pub mod puzzle;
pub mod quest;
pub mod stamina;
pub mod state;

pub use actor::{AttackIntent, BodyKind, Player, Shadow, ShadowAction};
pub use combat::{AttackReport, CombatResolver, Enemy, EnemyKind, WardenPhase};
pub use common::{EntityId, Rect, Vec2};
pub use config::GameConfig;
pub use debt::{CURSES, CurseId, CurseUpdate, DebtCurse, ShadowDebtSystem};
pub use dialogue::{
    DialogueEngine, DialogueNode, DialogueResponse, DialogueScript, DialogueScriptError,
};
pub use economy::{
    InventorySystem, ItemCatalog, ItemCategory, ItemDefinition, ItemEffect, PurchaseError,
    PurchaseReceipt, ShopItem, ShopSystem,
};
pub use engine::{FrameReport, Simulation, SimulationError};
pub use env::{
    ContentError, EnemySpawn, ExitSpec, LevelDescriptor, LevelHints, NpcDefinition, NpcSpawn,
    PuzzleKind, PuzzleOptions, PuzzleSpec, SpawnPoints, StaticContent,
};
pub use error::{ErrorSeverity, GameError};
pub use event::{EventQueue, GameEvent};
pub use input::{InputFlags, InputSnapshot};
pub use light::{LightField, LightSource};
pub use puzzle::{PUZZLE_QUEST, PuzzleBoard, PuzzleSolved};
pub use quest::{ActiveQuest, QuestDefinition, QuestLog};
pub use stamina::StaminaRegulator;
pub use state::{
    InventoryError, KeyValueStore, Location, MemoryStorage, PersistError, PlayerStats, QuestError,
    QuestProgress, SAVE_KEY, SaveRecord, SaveValidationError, StatKey, StateStore, StorageError,
};
