//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shadow_core::ItemDefinition;

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalogRon {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// Duplicate ids are rejected so a later entry can never silently shadow
    /// an earlier one.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid item catalog {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        for (index, item) in catalog.items.iter().enumerate() {
            if catalog.items[..index].iter().any(|other| other.id == item.id) {
                anyhow::bail!("duplicate item id '{}'", item.id);
            }
        }
        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadow_core::ItemCategory;

    #[test]
    fn parses_type_alias_and_rejects_duplicates() {
        let items = ItemLoader::parse(
            r#"(items: [
                (id: "fuel", name: "Fuel", type: consumable, price: 50),
                (id: "lantern", name: "Lantern", description: "Old brass.", category: equipment, price: 0),
            ])"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, ItemCategory::Consumable);
        assert_eq!(items[1].description, "Old brass.");

        let err = ItemLoader::parse(
            r#"(items: [
                (id: "fuel", name: "Fuel", type: consumable, price: 50),
                (id: "fuel", name: "More Fuel", type: consumable, price: 60),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate item id 'fuel'"));
    }
}
