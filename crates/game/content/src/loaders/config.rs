//! Game configuration loader.

use std::path::Path;

use shadow_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Sections and keys that are absent
    /// keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [stamina]
            regen_per_second = 12.0

            [economy]
            starting_credits = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.stamina.regen_per_second, 12.0);
        assert_eq!(config.stamina.cap, 100.0);
        assert_eq!(config.economy.starting_credits, 200);
        assert_eq!(config.lantern, GameConfig::default().lantern);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }
}
