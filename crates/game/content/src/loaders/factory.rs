//! Content factory for loading a whole data directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use shadow_core::{
    DialogueScript, GameConfig, ItemDefinition, LevelDescriptor, NpcDefinition, QuestDefinition,
    StaticContent,
};

use crate::loaders::{
    ConfigLoader, DialogueLoader, ItemLoader, LoadResult, MapLoader, NpcLoader, QuestLoader,
};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── quests.ron
/// ├── dialogues.ron
/// ├── npcs.ron
/// └── maps/
///     ├── town.ron
///     └── boss_arena.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`. A missing file yields the
    /// defaults.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load quest definitions from `quests.ron`.
    pub fn load_quests(&self) -> LoadResult<Vec<QuestDefinition>> {
        QuestLoader::load(&self.data_dir.join("quests.ron"))
    }

    /// Load dialogue scripts from `dialogues.ron`.
    pub fn load_dialogues(&self) -> LoadResult<BTreeMap<String, DialogueScript>> {
        DialogueLoader::load(&self.data_dir.join("dialogues.ron"))
    }

    /// Load the NPC registry from `npcs.ron`.
    pub fn load_npcs(&self) -> LoadResult<Vec<NpcDefinition>> {
        NpcLoader::load(&self.data_dir.join("npcs.ron"))
    }

    /// Load a level from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<LevelDescriptor> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Load every level under `maps/`.
    pub fn load_maps(&self) -> LoadResult<Vec<LevelDescriptor>> {
        MapLoader::load_dir(&self.data_dir.join("maps"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Everything a simulation needs from disk.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub content: StaticContent,
    pub config: GameConfig,
}

impl ContentBundle {
    /// Loads and cross-checks a full data directory.
    ///
    /// Beyond per-file parsing this verifies that NPCs name existing dialogue
    /// scripts, that placed NPCs are registered, and that dialogue `shop` and
    /// `setQuest` hooks point at known items and quests.
    pub fn load_dir(data_dir: impl Into<PathBuf>) -> LoadResult<Self> {
        let factory = ContentFactory::new(data_dir);
        let config = factory.load_config()?;
        let items = factory.load_items()?;
        let quests = factory.load_quests()?;
        let dialogues = factory.load_dialogues()?;
        let npcs = factory.load_npcs()?;
        let levels = factory.load_maps()?;

        let content = StaticContent::new()
            .with_items(items)
            .with_quests(quests)
            .with_npcs(npcs)
            .with_dialogues(dialogues)?
            .with_levels(levels)?;
        cross_check(&content)?;

        tracing::info!(
            data_dir = %factory.data_dir().display(),
            items = content.items.len(),
            quests = content.quests.len(),
            dialogues = content.dialogues.len(),
            levels = content.levels().len(),
            "content loaded"
        );
        Ok(Self { content, config })
    }
}

fn cross_check(content: &StaticContent) -> LoadResult<()> {
    for npc in content.npcs.values() {
        if !content.dialogues.contains_key(&npc.dialog) {
            anyhow::bail!("NPC '{}' uses unknown dialogue '{}'", npc.id, npc.dialog);
        }
    }
    for level in content.levels() {
        for spawn in &level.npcs {
            if content.npc(&spawn.id).is_none() {
                anyhow::bail!("Level '{}' places unknown NPC '{}'", level.id, spawn.id);
            }
        }
    }
    for (id, script) in &content.dialogues {
        for node in script.nodes.values() {
            for response in &node.responses {
                if let Some(item) = &response.shop
                    && content.items.get(item).is_none()
                {
                    anyhow::bail!("Dialogue '{}' sells unknown item '{}'", id, item);
                }
                if let Some(quest) = &response.set_quest
                    && !content.quests.iter().any(|known| &known.id == quest)
                {
                    anyhow::bail!("Dialogue '{}' starts unknown quest '{}'", id, quest);
                }
            }
        }
    }
    Ok(())
}
