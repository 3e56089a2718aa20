//! Game configuration constants and tunable parameters.
//!
//! Every section deserializes with `#[serde(default)]` so partial TOML files
//! only need to name the values they override.
use serde::{Deserialize, Serialize};

use crate::common::Vec2;

/// Root configuration handed to every system at construction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub stamina: StaminaConfig,
    pub debt: DebtConfig,
    pub combat: CombatConfig,
    pub lantern: LanternConfig,
    pub player: PlayerConfig,
    pub shadow: ShadowConfig,
    pub economy: EconomyConfig,
    pub interaction: InteractionConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stamina pool ceiling and regeneration speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    pub cap: f32,
    /// Stamina restored per second at zero debt.
    pub regen_per_second: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            cap: 100.0,
            regen_per_second: 8.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtConfig {
    /// HP lost per frame while bleeding is `delta_ms / bleed_divisor_ms`.
    pub bleed_divisor_ms: f32,
    /// Debt removed (and fuel spent) per shrine interaction.
    pub shrine_appease: f32,
    /// Debt gained each time the shadow phases.
    pub phase_cost: f32,
}

impl Default for DebtConfig {
    fn default() -> Self {
        Self {
            bleed_divisor_ms: 500.0,
            shrine_appease: 15.0,
            phase_cost: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub player_contact_damage: f32,
    pub shadow_contact_damage: f32,
    /// Invulnerability window after a contact hit, per body.
    pub contact_grace_ms: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_contact_damage: 10.0,
            shadow_contact_damage: 8.0,
            contact_grace_ms: 500.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanternConfig {
    pub radius: f32,
    pub intensity: f32,
    /// Where the lantern is parked while switched off.
    pub off_position: Vec2,
    pub off_radius: f32,
}

impl Default for LanternConfig {
    fn default() -> Self {
        Self {
            radius: 80.0,
            intensity: 1.0,
            off_position: Vec2::new(-999.0, -999.0),
            off_radius: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub dash_speed: f32,
    pub dash_cost: f32,
    pub dash_duration_ms: f32,
    pub dash_cooldown_ms: f32,
    pub attack_size: f32,
    pub attack_damage: f32,
    pub attack_cooldown_ms: f32,
    /// Below this light level the player counts as standing in shadow.
    pub shadow_threshold: f32,
    pub shadow_speed_modifier: f32,
    pub body_size: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 70.0,
            dash_speed: 140.0,
            dash_cost: 15.0,
            dash_duration_ms: 150.0,
            dash_cooldown_ms: 400.0,
            attack_size: 12.0,
            attack_damage: 10.0,
            attack_cooldown_ms: 320.0,
            shadow_threshold: 0.25,
            shadow_speed_modifier: 0.6,
            body_size: 8.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub speed: f32,
    /// The shadow may act only below this light level.
    pub darkness_threshold: f32,
    pub attack_reach: f32,
    pub attack_damage: f32,
    pub attack_cooldown_ms: f32,
    pub swap_cooldown_ms: f32,
    pub max_health: f32,
    /// Light level above which the shadow burns.
    pub burn_threshold: f32,
    /// Light level above which swapping into the shadow burns it at once.
    pub swap_burn_threshold: f32,
    pub swap_burn_ms: f32,
    pub health_burn_divisor: f32,
    pub hp_burn_divisor: f32,
    pub body_size: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            speed: 90.0,
            darkness_threshold: 0.45,
            attack_reach: 16.0,
            attack_damage: 14.0,
            attack_cooldown_ms: 220.0,
            swap_cooldown_ms: 1000.0,
            max_health: 100.0,
            burn_threshold: 0.7,
            swap_burn_threshold: 0.6,
            swap_burn_ms: 200.0,
            health_burn_divisor: 20.0,
            hp_burn_divisor: 30.0,
            body_size: 8.0,
        }
    }
}

/// Shop balance and item effect magnitudes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_credits: u32,
    pub fuel_restore: f32,
    pub fuel_cap: f32,
    pub stamina_charm_bonus: f32,
    pub stamina_charm_cap: f32,
    pub debt_charm_bonus: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_credits: 120,
            fuel_restore: 40.0,
            fuel_cap: 150.0,
            stamina_charm_bonus: 20.0,
            stamina_charm_cap: 130.0,
            debt_charm_bonus: 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Maximum distance at which `interact` reaches an NPC.
    pub npc_radius: f32,
    pub exit_size: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            npc_radius: 24.0,
            exit_size: 16.0,
        }
    }
}
