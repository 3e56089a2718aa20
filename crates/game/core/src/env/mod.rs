//! Read-only world data.
//!
//! [`StaticContent`] bundles item definitions, quests, dialogue scripts, the
//! NPC registry and level descriptors. The simulation only reads it; loading
//! from disk lives in the content crate.
mod error;
mod map;
mod npc;

use std::collections::BTreeMap;

pub use error::ContentError;
pub use map::{
    EnemySpawn, ExitSpec, LevelDescriptor, LevelHints, NpcSpawn, PuzzleKind, PuzzleOptions,
    PuzzleSpec, SpawnPoints,
};
pub use npc::NpcDefinition;

use crate::dialogue::DialogueScript;
use crate::economy::{ItemCatalog, ItemDefinition};
use crate::quest::QuestDefinition;

#[derive(Clone, Debug, Default)]
pub struct StaticContent {
    pub items: ItemCatalog,
    pub quests: Vec<QuestDefinition>,
    pub dialogues: BTreeMap<String, DialogueScript>,
    pub npcs: BTreeMap<String, NpcDefinition>,
    levels: Vec<LevelDescriptor>,
}

impl StaticContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    pub fn with_quests(mut self, quests: Vec<QuestDefinition>) -> Self {
        self.quests = quests;
        self
    }

    /// Adds dialogue scripts, rejecting any that fail validation.
    pub fn with_dialogues(
        mut self,
        dialogues: impl IntoIterator<Item = (String, DialogueScript)>,
    ) -> Result<Self, ContentError> {
        for (id, script) in dialogues {
            script
                .validate()
                .map_err(|err| ContentError::InvalidDialogue {
                    id: id.clone(),
                    reason: err.to_string(),
                })?;
            self.dialogues.insert(id, script);
        }
        Ok(self)
    }

    pub fn with_npcs(mut self, npcs: impl IntoIterator<Item = NpcDefinition>) -> Self {
        self.npcs = npcs.into_iter().map(|npc| (npc.id.clone(), npc)).collect();
        self
    }

    pub fn with_levels(
        mut self,
        levels: impl IntoIterator<Item = LevelDescriptor>,
    ) -> Result<Self, ContentError> {
        for level in levels {
            self.add_level(level)?;
        }
        Ok(self)
    }

    pub fn add_level(&mut self, level: LevelDescriptor) -> Result<(), ContentError> {
        if self
            .levels
            .iter()
            .any(|existing| existing.scene == level.scene && existing.id == level.id)
        {
            return Err(ContentError::DuplicateLevel {
                scene: level.scene,
                id: level.id,
            });
        }
        self.levels.push(level);
        Ok(())
    }

    /// Level serving `entry` of `scene`.
    pub fn level(&self, scene: &str, entry: &str) -> Result<&LevelDescriptor, ContentError> {
        self.levels
            .iter()
            .find(|level| level.serves(scene, entry))
            .ok_or_else(|| ContentError::UnknownLevel {
                scene: scene.to_owned(),
                entry: entry.to_owned(),
            })
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    pub fn npc(&self, id: &str) -> Option<&NpcDefinition> {
        self.npcs.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Vec2;

    fn level(scene: &str, id: &str) -> LevelDescriptor {
        LevelDescriptor {
            id: id.into(),
            name: id.into(),
            scene: scene.into(),
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
            entries: BTreeMap::from([(
                "lightworks".to_owned(),
                SpawnPoints {
                    player: Vec2::new(96.0, 96.0),
                    shadow: Vec2::new(104.0, 96.0),
                },
            )]),
            lantern_radius: None,
            phase_debt_bonus: 0.0,
            hints: LevelHints::default(),
        }
    }

    #[test]
    fn levels_resolve_by_id_or_extra_entry() {
        let content = StaticContent::new()
            .with_levels([
                level("DungeonScene", "entrance"),
                level("OverworldScene", "town"),
            ])
            .unwrap();

        let dungeon = content.level("DungeonScene", "lightworks").unwrap();
        assert_eq!(dungeon.id, "entrance");
        assert_eq!(
            dungeon.spawn_for("lightworks").player,
            Vec2::new(96.0, 96.0)
        );
        assert_eq!(dungeon.spawn_for("entrance").player, Vec2::new(48.0, 48.0));

        assert_eq!(
            content.level("OverworldScene", "district9"),
            Err(ContentError::UnknownLevel {
                scene: "OverworldScene".into(),
                entry: "district9".into(),
            })
        );
    }

    #[test]
    fn duplicate_levels_are_rejected() {
        let err = StaticContent::new()
            .with_levels([level("BossScene", "arena"), level("BossScene", "arena")])
            .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateLevel { .. }));
    }
}
