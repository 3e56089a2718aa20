//! Data-driven content definitions and loaders.
//!
//! This crate reads the static world data consumed by `shadow-core`:
//! - Item catalog (RON)
//! - Quest definitions (RON)
//! - Dialogue scripts (RON, validated on load)
//! - NPC registry (RON)
//! - Level descriptors, one RON file per level
//! - Game configuration (TOML)
//!
//! Content is read-only at runtime and never appears in the save record.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, DialogueLoader, ItemLoader, LoadResult, MapLoader,
    NpcLoader, QuestLoader,
};
