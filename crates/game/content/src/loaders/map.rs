//! Level descriptor loader.
//!
//! Each level lives in its own RON file under `maps/`. A descriptor carries
//! light sources, spawns, hostiles, NPC placements, puzzles and exits.

use std::path::Path;

use shadow_core::LevelDescriptor;

use crate::loaders::{LoadResult, read_file};

/// Loader for level descriptors from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load one level descriptor.
    pub fn load(path: &Path) -> LoadResult<LevelDescriptor> {
        let content = read_file(path)?;
        let level: LevelDescriptor = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON {}: {}", path.display(), e))?;

        if level.width == 0 || level.height == 0 {
            anyhow::bail!("Map {} has an empty grid", path.display());
        }
        Ok(level)
    }

    /// Load every `*.ron` file in `dir`, in file-name order.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<LevelDescriptor>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read maps {}: {}", dir.display(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| Self::load(path)).collect()
    }
}
