//! Content loaders for reading game data from files.
//!
//! Every loader is a unit struct with a `load(path)` function that parses a
//! single file. [`ContentFactory`] knows the data directory layout and
//! [`ContentBundle`] assembles everything into a [`shadow_core::StaticContent`].

pub mod config;
pub mod dialogue;
pub mod factory;
pub mod item;
pub mod map;
pub mod npc;
pub mod quest;

pub use config::ConfigLoader;
pub use dialogue::DialogueLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use item::ItemLoader;
pub use map::MapLoader;
pub use npc::NpcLoader;
pub use quest::QuestLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
