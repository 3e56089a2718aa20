//! Frame-driven simulation.
//!
//! [`Simulation`] owns the [`StateStore`] and every system, and advances them
//! in a fixed order on each [`Simulation::step`]:
//!
//! 1. input resolution (edge detection, pause, interaction, lantern)
//! 2. light sampling
//! 3. actor updates, attacks and contact checks
//! 4. resource systems (stamina, then debt)
//! 5. puzzle, quest and exit checks
//! 6. event flush into the returned [`FrameReport`]
mod errors;
mod frame;
mod interaction;

use std::sync::Arc;

pub use errors::SimulationError;
pub use frame::FrameReport;

use crate::actor::{BodyKind, Player, Shadow};
use crate::combat::{CombatResolver, Enemy};
use crate::config::GameConfig;
use crate::debt::ShadowDebtSystem;
use crate::dialogue::{DialogueEngine, DialogueNode};
use crate::economy::{InventorySystem, ShopSystem};
use crate::env::{ContentError, LevelDescriptor, StaticContent};
use crate::event::{EventQueue, GameEvent};
use crate::input::InputSnapshot;
use crate::light::LightField;
use crate::puzzle::PuzzleBoard;
use crate::quest::QuestLog;
use crate::stamina::StaminaRegulator;
use crate::state::{PersistError, SaveRecord, StateStore};

/// Level currently being simulated.
#[derive(Clone, Debug)]
struct ActiveLevel {
    descriptor: LevelDescriptor,
    entry: String,
}

pub struct Simulation {
    config: GameConfig,
    content: Arc<StaticContent>,
    store: StateStore,
    light: LightField,
    stamina: StaminaRegulator,
    debt: ShadowDebtSystem,
    combat: CombatResolver,
    quests: QuestLog,
    dialogue: DialogueEngine,
    shop: ShopSystem,
    puzzles: PuzzleBoard,
    player: Player,
    shadow: Shadow,
    controlling: BodyKind,
    lantern_on: bool,
    paused: bool,
    previous_input: InputSnapshot,
    level: Option<ActiveLevel>,
    events: EventQueue,
}

impl Simulation {
    /// Builds a simulation around `store`. No level is entered yet; call
    /// [`Simulation::new_game`] or [`Simulation::resume`].
    pub fn new(config: GameConfig, content: Arc<StaticContent>, store: StateStore) -> Self {
        let mut quests = QuestLog::new();
        quests.register(content.quests.iter().cloned());

        let mut dialogue = DialogueEngine::new();
        for (id, script) in &content.dialogues {
            dialogue.load(id.clone(), script.clone());
        }

        let mut shadow = Shadow::new(Default::default(), &config.shadow);
        shadow.set_controlled(false);

        Self {
            stamina: StaminaRegulator::new(&config.stamina),
            debt: ShadowDebtSystem::new(&config.debt),
            combat: CombatResolver::new(&config.combat),
            shop: ShopSystem::new(InventorySystem::new(&config.economy)),
            player: Player::new(Default::default(), &config.player),
            shadow,
            quests,
            dialogue,
            content,
            store,
            light: LightField::new(),
            puzzles: PuzzleBoard::new(),
            controlling: BodyKind::Player,
            lantern_on: true,
            paused: false,
            previous_input: InputSnapshot::default(),
            level: None,
            events: EventQueue::new(),
            config,
        }
    }

    /// Resets the record and enters its starting level.
    pub fn new_game(&mut self) -> Result<(), ContentError> {
        self.store.new_game();
        self.resume()
    }

    /// Enters the level named by the record's current location.
    pub fn resume(&mut self) -> Result<(), ContentError> {
        let location = self.store.location().clone();
        self.enter_level(&location.scene, &location.entry)
    }

    /// Tears down the current level and builds `entry` of `scene`.
    ///
    /// On error the current level is left running.
    pub fn enter_level(&mut self, scene: &str, entry: &str) -> Result<(), ContentError> {
        let descriptor = self.content.level(scene, entry)?.clone();
        tracing::info!(scene, entry, level = %descriptor.name, "entering level");

        self.store.set_location(scene, entry);
        self.combat.clear();
        self.dialogue.end();
        self.debt.reset();

        self.light = LightField::new();
        self.light
            .load_static_sources(descriptor.light_sources.iter().copied());
        self.puzzles = PuzzleBoard::from_specs(&descriptor.puzzles, &mut self.light);

        for spawn in &descriptor.enemies {
            self.combat
                .register_enemy(Enemy::new(spawn.kind, spawn.position()));
        }

        let spawn = descriptor.spawn_for(entry);
        self.player = Player::new(spawn.player, &self.config.player);
        self.shadow = Shadow::new(spawn.shadow, &self.config.shadow);
        self.shadow.set_controlled(false);
        self.controlling = BodyKind::Player;
        self.previous_input = InputSnapshot::default();

        if let Some(hint) = &descriptor.hints.enter {
            self.events.push(GameEvent::hint(hint.clone()));
        }
        self.events.push(GameEvent::HudRefresh);

        self.level = Some(ActiveLevel {
            descriptor,
            entry: entry.to_owned(),
        });
        Ok(())
    }

    /// Persists the record through the store's medium.
    pub fn save(&self) -> Result<(), PersistError> {
        self.store.save()
    }

    /// Loads the saved record and enters its level. Returns `Ok(None)` when
    /// nothing was saved.
    ///
    /// The record is committed only once its level is known to exist, so a
    /// failed load leaves both the record and the running level as they were.
    pub fn load(&mut self) -> Result<Option<SaveRecord>, SimulationError> {
        let Some(record) = self.store.read_saved()? else {
            return Ok(None);
        };
        let location = record.location.clone();
        self.content.level(&location.scene, &location.entry)?;
        self.store.restore(record.clone());
        self.enter_level(&location.scene, &location.entry)?;
        tracing::debug!(scene = %location.scene, entry = %location.entry, "save loaded");
        Ok(Some(record))
    }

    /// Chooses response `index` of the current dialogue node.
    ///
    /// The response's quest is activated first, then its shop item is
    /// purchased, then the conversation advances. Returns the next node, or
    /// `None` when the conversation ended or `index` was out of range.
    pub fn select_response(&mut self, index: usize) -> Option<&DialogueNode> {
        let response = self.dialogue.response(index)?.clone();
        self.apply_response_effects(&response);
        self.dialogue.choose(&response)
    }

    /// Turns mirror `index` of the current level one step.
    pub fn rotate_mirror(&mut self, index: usize) -> bool {
        self.puzzles.rotate_mirror(index)
    }

    /// Removes pending events that were raised outside [`Simulation::step`].
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn quest_hud_lines(&self) -> Vec<String> {
        self.quests.hud_lines(&self.store)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn content(&self) -> &StaticContent {
        &self.content
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn light(&self) -> &LightField {
        &self.light
    }

    pub fn debt(&self) -> &ShadowDebtSystem {
        &self.debt
    }

    pub fn combat(&self) -> &CombatResolver {
        &self.combat
    }

    pub fn quest_log(&self) -> &QuestLog {
        &self.quests
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    pub fn shop(&self) -> &ShopSystem {
        &self.shop
    }

    pub fn puzzles(&self) -> &PuzzleBoard {
        &self.puzzles
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn shadow(&self) -> &Shadow {
        &self.shadow
    }

    pub fn controlling(&self) -> BodyKind {
        self.controlling
    }

    pub fn lantern_on(&self) -> bool {
        self.lantern_on
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn level(&self) -> Option<&LevelDescriptor> {
        self.level.as_ref().map(|level| &level.descriptor)
    }

    pub fn entry(&self) -> Option<&str> {
        self.level.as_ref().map(|level| level.entry.as_str())
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = self.level.as_ref().map(|level| &level.descriptor.id);
        f.debug_struct("Simulation")
            .field("level", &level)
            .field("controlling", &self.controlling)
            .field("lantern_on", &self.lantern_on)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Vec2;
    use crate::env::{LevelHints, SpawnPoints};
    use crate::state::{KeyValueStore, Location, MemoryStorage, SAVE_KEY};

    fn town() -> LevelDescriptor {
        LevelDescriptor {
            id: "town".into(),
            name: "Town".into(),
            scene: "OverworldScene".into(),
            width: 40,
            height: 22,
            light_sources: Vec::new(),
            enemies: Vec::new(),
            npcs: Vec::new(),
            puzzles: Vec::new(),
            exits: Vec::new(),
            spawn: SpawnPoints {
                player: Vec2::new(48.0, 48.0),
                shadow: Vec2::new(64.0, 48.0),
            },
            entries: Default::default(),
            lantern_radius: None,
            phase_debt_bonus: 0.0,
            hints: LevelHints::default(),
        }
    }

    fn simulation(storage: Arc<MemoryStorage>) -> Simulation {
        let content = StaticContent::new().with_levels([town()]).unwrap();
        Simulation::new(
            GameConfig::default(),
            Arc::new(content),
            StateStore::with_storage(storage),
        )
    }

    fn store_record(storage: &MemoryStorage, record: &SaveRecord) {
        storage
            .set_item(SAVE_KEY, &serde_json::to_string(record).unwrap())
            .unwrap();
    }

    #[test]
    fn load_enters_saved_level() {
        let storage = Arc::new(MemoryStorage::new());
        let mut saved = SaveRecord::new_game(7);
        saved.stats.hp = 12.0;
        store_record(&storage, &saved);

        let mut sim = simulation(storage);
        let loaded = sim.load().unwrap().expect("record was saved");

        assert_eq!(loaded, saved);
        assert_eq!(sim.store().snapshot(), saved);
        assert_eq!(sim.level().map(|level| level.id.as_str()), Some("town"));
    }

    #[test]
    fn load_of_unknown_level_keeps_state() {
        let storage = Arc::new(MemoryStorage::new());
        let mut sim = simulation(storage.clone());
        sim.new_game().unwrap();
        sim.drain_events();
        let before = sim.store().snapshot();

        let mut saved = SaveRecord::new_game(7);
        saved.location = Location::new("RemovedScene", "gone");
        saved.stats.hp = 12.0;
        store_record(&storage, &saved);

        let err = sim.load().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Content(ContentError::UnknownLevel { .. })
        ));
        assert_eq!(sim.store().snapshot(), before);
        assert_eq!(sim.level().map(|level| level.id.as_str()), Some("town"));
        assert!(sim.drain_events().is_empty());
    }
}
