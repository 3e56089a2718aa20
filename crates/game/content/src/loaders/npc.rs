//! NPC registry loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shadow_core::NpcDefinition;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NpcRegistryRon {
    npcs: Vec<NpcDefinition>,
}

/// Loader for the NPC registry from RON files.
pub struct NpcLoader;

impl NpcLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<NpcDefinition>> {
        let content = read_file(path)?;
        let registry: NpcRegistryRon = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse NPC registry RON {}: {}", path.display(), e)
        })?;

        Ok(registry.npcs)
    }
}
