//! Repository layer for data that changes during play.
//!
//! Saves go through the core [`KeyValueStore`] contract. [`FileStorage`] is
//! the durable medium; [`MemoryStorage`] is the in-process fallback.
//!
//! Static game content (items, NPCs, maps) comes from `shadow-content`, not
//! from repositories.

mod error;
mod file;

pub use error::{RepositoryError, Result};
pub use file::FileStorage;
pub use shadow_core::{KeyValueStore, MemoryStorage};
