//! Items, currency and the shop.
//!
//! Currency is part of the persisted record, so both systems here operate on
//! a [`StateStore`] passed in by the caller.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::EconomyConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{InventoryError, StatKey, StateStore};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemCategory {
    Equipment,
    Consumable,
    Charm,
    Key,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "type")]
    pub category: ItemCategory,
    pub price: u32,
}

/// Static item definitions keyed by id.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, ItemDefinition>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ItemDefinition> for ItemCatalog {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for item in iter {
            catalog.insert(item);
        }
        catalog
    }
}

/// Stat change produced by [`InventorySystem::apply_item_effect`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Lantern fuel after the refill.
    LanternFuel(f32),
    /// Stamina after the charm's boost.
    Stamina(f32),
    /// Debt cap after the charm raised it.
    DebtCap(f32),
}

/// Inventory and wallet operations over the store.
#[derive(Clone, Debug, Default)]
pub struct InventorySystem {
    config: EconomyConfig,
}

impl InventorySystem {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn add(&self, store: &mut StateStore, id: &str, amount: u32) {
        store.add_item(id, amount);
    }

    pub fn consume(
        &self,
        store: &mut StateStore,
        id: &str,
        amount: u32,
    ) -> Result<(), InventoryError> {
        store.remove_item(id, amount)
    }

    pub fn has(&self, store: &StateStore, id: &str, amount: u32) -> bool {
        store.has_item(id, amount)
    }

    pub fn list<'a>(&self, store: &'a StateStore) -> &'a BTreeMap<String, u32> {
        store.inventory()
    }

    pub fn credits(&self, store: &StateStore) -> u32 {
        store.credits()
    }

    pub fn add_credits(&self, store: &mut StateStore, amount: u32) {
        store.set_credits(store.credits().saturating_add(amount));
    }

    /// Debits `amount`, or fails leaving the balance untouched.
    pub fn spend_credits(&self, store: &mut StateStore, amount: u32) -> Result<(), PurchaseError> {
        let available = store.credits();
        let remaining = available
            .checked_sub(amount)
            .ok_or(PurchaseError::InsufficientCredits {
                required: amount,
                available,
            })?;
        store.set_credits(remaining);
        Ok(())
    }

    /// Applies the stat effect bound to `item`, if it has one.
    pub fn apply_item_effect(
        &self,
        store: &mut StateStore,
        item: &ItemDefinition,
    ) -> Option<ItemEffect> {
        let stats = store.stats();
        let effect = match item.id.as_str() {
            "fuel" => {
                let fuel =
                    (stats.lantern_fuel + self.config.fuel_restore).min(self.config.fuel_cap);
                store.update_stat(StatKey::LanternFuel, fuel);
                ItemEffect::LanternFuel(fuel)
            }
            "charm_stamina" => {
                let stamina = (stats.stamina + self.config.stamina_charm_bonus)
                    .min(self.config.stamina_charm_cap);
                store.update_stat(StatKey::Stamina, stamina);
                ItemEffect::Stamina(stamina)
            }
            "charm_debt" => {
                let cap = stats.debt_cap + self.config.debt_charm_bonus;
                store.update_stat(StatKey::DebtCap, cap);
                ItemEffect::DebtCap(cap)
            }
            _ => return None,
        };
        tracing::debug!(item = %item.id, ?effect, "applied item effect");
        Some(effect)
    }
}

/// A purchase request.
#[derive(Clone, Copy, Debug)]
pub struct ShopItem<'a> {
    pub item: &'a ItemDefinition,
    pub quantity: u32,
}

impl<'a> ShopItem<'a> {
    pub fn single(item: &'a ItemDefinition) -> Self {
        Self { item, quantity: 1 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseReceipt {
    pub item: String,
    pub quantity: u32,
    pub cost: u32,
    pub remaining_credits: u32,
    pub effect: Option<ItemEffect>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error("need {required} credits but only {available} available")]
    InsufficientCredits { required: u32, available: u32 },

    #[error("cannot buy zero of '{item}'")]
    ZeroQuantity { item: String },

    #[error("price of {quantity} x '{item}' overflows")]
    PriceOverflow { item: String, quantity: u32 },
}

impl GameError for PurchaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientCredits { .. } => ErrorSeverity::Recoverable,
            Self::ZeroQuantity { .. } | Self::PriceOverflow { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientCredits { .. } => "PURCHASE_INSUFFICIENT_CREDITS",
            Self::ZeroQuantity { .. } => "PURCHASE_ZERO_QUANTITY",
            Self::PriceOverflow { .. } => "PURCHASE_PRICE_OVERFLOW",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShopSystem {
    inventory: InventorySystem,
}

impl ShopSystem {
    pub fn new(inventory: InventorySystem) -> Self {
        Self { inventory }
    }

    pub fn inventory(&self) -> &InventorySystem {
        &self.inventory
    }

    /// Buys `request.quantity` of an item for `price * quantity` credits.
    ///
    /// Every check runs before the first mutation, so a failed purchase
    /// leaves credits, inventory and stats exactly as they were. The item's
    /// effect is applied once per purchase.
    pub fn purchase(
        &self,
        store: &mut StateStore,
        request: ShopItem<'_>,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let item = request.item;
        if request.quantity == 0 {
            return Err(PurchaseError::ZeroQuantity {
                item: item.id.clone(),
            });
        }
        let cost = item
            .price
            .checked_mul(request.quantity)
            .ok_or_else(|| PurchaseError::PriceOverflow {
                item: item.id.clone(),
                quantity: request.quantity,
            })?;

        if let Err(err) = self.inventory.spend_credits(store, cost) {
            tracing::warn!(item = %item.id, cost, "purchase rejected: {err}");
            return Err(err);
        }
        self.inventory.add(store, &item.id, request.quantity);
        let effect = self.inventory.apply_item_effect(store, item);

        let receipt = PurchaseReceipt {
            item: item.id.clone(),
            quantity: request.quantity,
            cost,
            remaining_credits: store.credits(),
            effect,
        };
        tracing::debug!(item = %item.id, cost, remaining = receipt.remaining_credits, "purchase complete");
        Ok(receipt)
    }
}
