//! Level descriptors: light, spawns, hostiles, puzzles and exits.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::EnemyKind;
use crate::common::{Rect, Vec2};
use crate::light::LightSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoints {
    pub player: Vec2,
    pub shadow: Vec2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    #[serde(alias = "type")]
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
}

impl EnemySpawn {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

impl NpcSpawn {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    MirrorCorridor,
    PressurePlates,
    RotatingLamp,
    ShadowMaze,
    Shrine,
}

/// Per-puzzle tuning. Unset fields fall back to the puzzle's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleOptions {
    pub gate_x: Option<f32>,
    pub gate_y: Option<f32>,
    pub initial_angle: Option<u32>,
    pub radius: Option<f32>,
    pub intensity: Option<f32>,
    pub step: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    #[serde(alias = "type")]
    pub kind: PuzzleKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub options: PuzzleOptions,
}

/// Zone that sends the player to another scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitSpec {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub target_scene: String,
    pub target_entry: String,
}

impl ExitSpec {
    pub fn zone(&self, size: f32) -> Rect {
        Rect::centered(Vec2::new(self.x, self.y), size, size)
    }
}

/// Level-specific HUD text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelHints {
    pub enter: Option<String>,
    pub curse_applied: Option<String>,
    pub curse_cleared: Option<String>,
    pub boss_defeated: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Default entry name, unique within the scene.
    pub id: String,
    pub name: String,
    pub scene: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub light_sources: Vec<LightSource>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub npcs: Vec<NpcSpawn>,
    #[serde(default)]
    pub puzzles: Vec<PuzzleSpec>,
    #[serde(default)]
    pub exits: Vec<ExitSpec>,
    pub spawn: SpawnPoints,
    /// Alternative entries with their own spawn points.
    #[serde(default)]
    pub entries: BTreeMap<String, SpawnPoints>,
    /// Lantern radius override for this level.
    #[serde(default)]
    pub lantern_radius: Option<f32>,
    /// Extra debt charged per shadow phase in this level.
    #[serde(default)]
    pub phase_debt_bonus: f32,
    #[serde(default)]
    pub hints: LevelHints,
}

impl LevelDescriptor {
    /// Whether this level serves `entry` of `scene`.
    pub fn serves(&self, scene: &str, entry: &str) -> bool {
        self.scene == scene && (self.id == entry || self.entries.contains_key(entry))
    }

    /// Spawn points for `entry`, falling back to the default spawn.
    pub fn spawn_for(&self, entry: &str) -> SpawnPoints {
        self.entries.get(entry).copied().unwrap_or(self.spawn)
    }

    pub fn has_puzzle(&self, kind: PuzzleKind) -> bool {
        self.puzzles.iter().any(|puzzle| puzzle.kind == kind)
    }
}
