//! Quest definition loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shadow_core::QuestDefinition;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestCatalogRon {
    quests: Vec<QuestDefinition>,
}

/// Loader for quest definitions from RON files.
pub struct QuestLoader;

impl QuestLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<QuestDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid quest file {}: {}", path.display(), e))
    }

    /// Parses a quest list. Every quest needs at least one objective.
    pub fn parse(content: &str) -> LoadResult<Vec<QuestDefinition>> {
        let catalog: QuestCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse quest RON: {}", e))?;

        for (index, quest) in catalog.quests.iter().enumerate() {
            if quest.objectives.is_empty() {
                anyhow::bail!("quest '{}' has no objectives", quest.id);
            }
            if catalog.quests[..index].iter().any(|other| other.id == quest.id) {
                anyhow::bail!("duplicate quest id '{}'", quest.id);
            }
        }
        Ok(catalog.quests)
    }
}
