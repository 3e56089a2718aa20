//! Stamina regeneration throttled by shadow debt.
use crate::config::StaminaConfig;
use crate::state::{StatKey, StateStore};

/// Tops stamina up each tick. Regeneration scales with `1 - debt/cap`, so a
/// full debt stops recovery entirely.
#[derive(Clone, Debug)]
pub struct StaminaRegulator {
    regen_per_second: f32,
    cap: f32,
}

impl StaminaRegulator {
    pub fn new(config: &StaminaConfig) -> Self {
        Self {
            regen_per_second: config.regen_per_second,
            cap: config.cap,
        }
    }

    /// Advances regeneration by `delta_ms` and returns the stamina gained.
    pub fn update(&self, store: &mut StateStore, delta_ms: f32) -> f32 {
        let stats = store.stats();
        if stats.stamina >= self.cap {
            return 0.0;
        }
        let throttle = (1.0 - stats.debt_ratio()).max(0.0);
        let regen = (delta_ms / 1000.0) * self.regen_per_second * throttle;
        let next = (stats.stamina + regen).min(self.cap);
        store.update_stat(StatKey::Stamina, next);
        next - stats.stamina
    }
}

impl Default for StaminaRegulator {
    fn default() -> Self {
        Self::new(&StaminaConfig::default())
    }
}
