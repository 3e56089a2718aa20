//! Shadow-debt curse machine.
//!
//! Each curse is bound to a fraction of the debt cap and is evaluated on its
//! own every update, so an abrupt debt swing can apply or clear several curses
//! at once and in any order. Boundaries: a curse applies when
//! `debt >= threshold` and clears when `debt < threshold`.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::DebtConfig;
use crate::event::{EventQueue, GameEvent};
use crate::state::{StatKey, StateStore};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CurseId {
    LowRegen,
    Flicker,
    HpBleed,
}

/// A status effect bound to a debt threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebtCurse {
    pub id: CurseId,
    pub description: &'static str,
    /// 1-based position in [`CURSES`]; the threshold is `tier / CURSES.len()`
    /// of the debt cap.
    pub tier: u8,
}

impl DebtCurse {
    /// Debt at which this curse applies for the given cap.
    pub fn threshold(&self, debt_cap: f32) -> f32 {
        (f32::from(self.tier) / CURSES.len() as f32) * debt_cap
    }
}

/// Curses in order of severity.
pub const CURSES: [DebtCurse; 3] = [
    DebtCurse {
        id: CurseId::LowRegen,
        description: "Stamina regen reduced.",
        tier: 1,
    },
    DebtCurse {
        id: CurseId::Flicker,
        description: "Lantern flickers randomly.",
        tier: 2,
    },
    DebtCurse {
        id: CurseId::HpBleed,
        description: "Gradual HP drain.",
        tier: 3,
    },
];

/// Counts of transitions made by one [`ShadowDebtSystem::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurseUpdate {
    pub applied: usize,
    pub cleared: usize,
}

#[derive(Clone, Debug)]
pub struct ShadowDebtSystem {
    active: BTreeSet<CurseId>,
    bleed_divisor_ms: f32,
}

impl ShadowDebtSystem {
    pub fn new(config: &DebtConfig) -> Self {
        Self {
            active: BTreeSet::new(),
            bleed_divisor_ms: config.bleed_divisor_ms,
        }
    }

    /// Re-evaluates every curse against current debt and applies HP bleed.
    pub fn update(
        &mut self,
        store: &mut StateStore,
        delta_ms: f32,
        events: &mut EventQueue,
    ) -> CurseUpdate {
        let stats = store.stats();
        let mut update = CurseUpdate::default();

        for curse in &CURSES {
            let threshold = curse.threshold(stats.debt_cap);
            if stats.debt >= threshold {
                if self.active.insert(curse.id) {
                    tracing::debug!(curse = %curse.id, debt = stats.debt, threshold, "curse applied");
                    events.push(GameEvent::CurseApplied { curse: curse.id });
                    update.applied += 1;
                }
            } else if self.active.remove(&curse.id) {
                tracing::debug!(curse = %curse.id, debt = stats.debt, threshold, "curse cleared");
                events.push(GameEvent::CurseCleared { curse: curse.id });
                update.cleared += 1;
            }
        }

        if self.active.contains(&CurseId::HpBleed) {
            let hp = (stats.hp - delta_ms / self.bleed_divisor_ms).max(0.0);
            store.update_stat(StatKey::Hp, hp);
        }

        update
    }

    /// Adds debt, clamped to the cap.
    pub fn increase(&self, store: &mut StateStore, amount: f32) {
        let stats = store.stats();
        store.update_stat(StatKey::Debt, (stats.debt + amount).min(stats.debt_cap));
    }

    /// Removes debt, floored at zero.
    pub fn reduce(&self, store: &mut StateStore, amount: f32) {
        let stats = store.stats();
        store.update_stat(StatKey::Debt, (stats.debt - amount).max(0.0));
    }

    /// Pays down debt with lantern fuel. Fuel bottoms out at zero.
    pub fn appease(&self, store: &mut StateStore, amount: f32) {
        self.reduce(store, amount);
        let fuel = store.stat(StatKey::LanternFuel);
        store.update_stat(StatKey::LanternFuel, (fuel - amount).max(0.0));
    }

    pub fn is_active(&self, curse: CurseId) -> bool {
        self.active.contains(&curse)
    }

    /// Active curses in severity order.
    pub fn curses(&self) -> Vec<&'static DebtCurse> {
        CURSES
            .iter()
            .filter(|curse| self.active.contains(&curse.id))
            .collect()
    }

    /// Forgets all active curses without emitting events (scene teardown).
    pub fn reset(&mut self) {
        self.active.clear();
    }
}

impl Default for ShadowDebtSystem {
    fn default() -> Self {
        Self::new(&DebtConfig::default())
    }
}
