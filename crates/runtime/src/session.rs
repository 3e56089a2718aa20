//! Game session: one simulation plus its storage and event bus.
//!
//! The session owns the [`Simulation`], stamps every drained event with the
//! frame counter and publishes it on the [`EventBus`]. Exits reported by a
//! frame are followed automatically unless disabled in [`RuntimeConfig`].

use std::path::PathBuf;
use std::sync::Arc;

use shadow_content::ContentBundle;
use shadow_core::{
    DialogueNode, FrameReport, GameConfig, InputSnapshot, KeyValueStore, SAVE_KEY, SaveRecord,
    Simulation, StateStore, StaticContent,
};
use tokio::sync::broadcast;

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::repository::FileStorage;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Directory for [`FileStorage`]. `None` keeps saves in memory unless a
    /// storage is injected through the builder.
    pub storage_dir: Option<PathBuf>,
    pub save_key: String,
    pub event_buffer_size: usize,
    /// Enter the target level as soon as a frame reports an exit.
    pub follow_exits: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            storage_dir: None,
            save_key: SAVE_KEY.to_owned(),
            event_buffer_size: 100,
            follow_exits: true,
        }
    }
}

pub struct Session {
    simulation: Simulation,
    bus: EventBus,
    frame: u64,
    follow_exits: bool,
}

impl Session {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Starts a fresh playthrough at the starting level.
    pub fn new_game(&mut self) -> Result<()> {
        self.simulation.new_game()?;
        tracing::info!(frame = self.frame, "new game started");
        self.flush();
        Ok(())
    }

    /// Loads the saved playthrough. Returns `false` when nothing was saved.
    pub fn load(&mut self) -> Result<bool> {
        let loaded: Option<SaveRecord> = self.simulation.load()?;
        match &loaded {
            Some(record) => tracing::info!(
                scene = %record.location.scene,
                entry = %record.location.entry,
                "save loaded"
            ),
            None => tracing::info!("no save to load"),
        }
        self.flush();
        Ok(loaded.is_some())
    }

    pub fn save(&self) -> Result<()> {
        self.simulation.save()?;
        tracing::info!(frame = self.frame, "game saved");
        Ok(())
    }

    /// Advances one frame and publishes its events.
    pub fn tick(&mut self, input: &InputSnapshot, delta_ms: f32) -> Result<FrameReport> {
        let report = self.simulation.step(input, delta_ms);
        self.bus
            .publish_all(self.frame, report.events.iter().cloned());

        if self.follow_exits
            && let Some(exit) = &report.exit
        {
            tracing::info!(exit = %exit.id, scene = %exit.target_scene, entry = %exit.target_entry, "following exit");
            self.simulation
                .enter_level(&exit.target_scene, &exit.target_entry)?;
            self.flush();
        }

        self.frame += 1;
        Ok(report)
    }

    /// Chooses a dialogue response and publishes the resulting hints.
    pub fn select_response(&mut self, index: usize) -> Option<DialogueNode> {
        let next = self.simulation.select_response(index).cloned();
        self.flush();
        next
    }

    pub fn rotate_mirror(&mut self, index: usize) -> bool {
        self.simulation.rotate_mirror(index)
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn flush(&mut self) {
        let events = self.simulation.drain_events();
        self.bus.publish_all(self.frame, events);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("frame", &self.frame)
            .field("follow_exits", &self.follow_exits)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Session`] with flexible configuration.
pub struct SessionBuilder {
    config: RuntimeConfig,
    content: Option<Arc<StaticContent>>,
    storage: Option<Arc<dyn KeyValueStore>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            storage: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required static content
    pub fn content(mut self, content: impl Into<Arc<StaticContent>>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Use a loaded bundle for both content and game configuration.
    pub fn bundle(mut self, bundle: ContentBundle) -> Self {
        self.config.game_config = bundle.config;
        self.content = Some(Arc::new(bundle.content));
        self
    }

    /// Load content and game configuration from a data directory.
    pub fn content_dir(self, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let bundle =
            ContentBundle::load_dir(&dir).map_err(|err| RuntimeError::ContentLoad {
                path: dir.clone(),
                reason: format!("{err:#}"),
            })?;
        Ok(self.bundle(bundle))
    }

    /// Persist through `storage` instead of the configured directory.
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn build(self) -> Result<Session> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let config = self.config;

        let storage = match (self.storage, &config.storage_dir) {
            (Some(storage), _) => Some(storage),
            (None, Some(dir)) => Some(Arc::new(FileStorage::new(dir)?) as Arc<dyn KeyValueStore>),
            (None, None) => None,
        };
        let store = StateStore::with_optional_storage(storage)
            .with_save_key(config.save_key.clone())
            .with_starting_credits(config.game_config.economy.starting_credits);

        tracing::info!(
            levels = content.levels().len(),
            save_key = %config.save_key,
            "session created"
        );
        Ok(Session {
            simulation: Simulation::new(config.game_config, content, store),
            bus: EventBus::with_capacity(config.event_buffer_size),
            frame: 0,
            follow_exits: config.follow_exits,
        })
    }
}
