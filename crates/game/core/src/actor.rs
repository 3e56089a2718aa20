//! The two controllable bodies: the player and their shadow.
//!
//! Both are plain data advanced by [`Player::update`] and [`Shadow::update`].
//! Movement integrates velocity directly; collision against level geometry
//! belongs to the presentation layer.
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::common::{Rect, Vec2};
use crate::config::{PlayerConfig, ShadowConfig};
use crate::input::{InputFlags, InputSnapshot};
use crate::state::{StatKey, StateStore};

/// Which body a contact or control change refers to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BodyKind {
    Player,
    Shadow,
}

impl BodyKind {
    pub fn other(self) -> Self {
        match self {
            Self::Player => Self::Shadow,
            Self::Shadow => Self::Player,
        }
    }
}

/// A hitbox produced by an attack, to be resolved by the combat resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackIntent {
    pub hitbox: Rect,
    pub damage: f32,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    controlled: bool,
    dash_timer_ms: f32,
    dash_cooldown_ms: f32,
    attack_timer_ms: f32,
    config: PlayerConfig,
}

impl Player {
    pub fn new(position: Vec2, config: &PlayerConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            controlled: true,
            dash_timer_ms: 0.0,
            dash_cooldown_ms: 0.0,
            attack_timer_ms: 0.0,
            config: config.clone(),
        }
    }

    pub fn set_controlled(&mut self, controlled: bool) {
        self.controlled = controlled;
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_timer_ms > 0.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.config.body_size, self.config.body_size)
    }

    /// Advances one frame. `light` is the level sampled at the player's
    /// position this frame. Dashing spends stamina through `store`.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        light: f32,
        delta_ms: f32,
        store: &mut StateStore,
    ) -> Option<AttackIntent> {
        if !self.controlled {
            self.velocity = Vec2::ZERO;
            return None;
        }

        let direction = input.movement();
        let modifier = if light < self.config.shadow_threshold {
            self.config.shadow_speed_modifier
        } else {
            1.0
        };

        let stamina = store.stat(StatKey::Stamina);
        if input.pressed(InputFlags::DASH)
            && stamina > self.config.dash_cost
            && self.dash_cooldown_ms <= 0.0
        {
            store.update_stat(StatKey::Stamina, (stamina - self.config.dash_cost).max(0.0));
            self.dash_timer_ms = self.config.dash_duration_ms;
            self.dash_cooldown_ms = self.config.dash_cooldown_ms;
        }

        let speed = if self.is_dashing() {
            self.config.dash_speed
        } else {
            self.config.speed * modifier
        };
        self.velocity = direction.scale(speed);

        let mut intent = None;
        if input.pressed(InputFlags::ATTACK) && self.attack_timer_ms <= 0.0 {
            let size = self.config.attack_size;
            intent = Some(AttackIntent {
                hitbox: Rect::centered(self.position, size, size),
                damage: self.config.attack_damage,
            });
            self.attack_timer_ms = self.config.attack_cooldown_ms;
        }

        self.dash_timer_ms = (self.dash_timer_ms - delta_ms).max(0.0);
        self.dash_cooldown_ms = (self.dash_cooldown_ms - delta_ms).max(0.0);
        self.attack_timer_ms = (self.attack_timer_ms - delta_ms).max(0.0);
        self.position = self.position + self.velocity.scale(delta_ms / 1000.0);
        intent
    }
}

/// What the shadow did during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShadowAction {
    pub attack: Option<AttackIntent>,
    /// The phase ability fired; the caller charges debt for it.
    pub phased: bool,
}

#[derive(Clone, Debug)]
pub struct Shadow {
    pub position: Vec2,
    pub velocity: Vec2,
    health: f32,
    controlled: bool,
    attack_timer_ms: f32,
    swap_cooldown_ms: f32,
    config: ShadowConfig,
}

impl Shadow {
    pub fn new(position: Vec2, config: &ShadowConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            health: config.max_health,
            controlled: false,
            attack_timer_ms: 0.0,
            swap_cooldown_ms: 0.0,
            config: config.clone(),
        }
    }

    pub fn set_controlled(&mut self, controlled: bool) {
        self.controlled = controlled;
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.config.body_size, self.config.body_size)
    }

    pub fn in_darkness(&self, light: f32) -> bool {
        light < self.config.darkness_threshold
    }

    pub fn can_swap(&self) -> bool {
        self.swap_cooldown_ms <= 0.0
    }

    pub fn mark_swapped(&mut self) {
        self.swap_cooldown_ms = self.config.swap_cooldown_ms;
    }

    /// Advances one frame. The shadow only moves, strikes and phases while
    /// it stands in darkness.
    pub fn update(&mut self, input: &InputSnapshot, light: f32, delta_ms: f32) -> ShadowAction {
        self.swap_cooldown_ms = (self.swap_cooldown_ms - delta_ms).max(0.0);
        if !self.controlled {
            self.velocity = Vec2::ZERO;
            return ShadowAction::default();
        }

        let dark = self.in_darkness(light);
        self.velocity = if dark {
            input.movement().scale(self.config.speed)
        } else {
            Vec2::ZERO
        };

        let mut action = ShadowAction::default();
        if dark && input.pressed(InputFlags::ATTACK) && self.attack_timer_ms <= 0.0 {
            let reach = self.config.attack_reach;
            action.attack = Some(AttackIntent {
                hitbox: Rect::centered(self.position, reach, reach),
                damage: self.config.attack_damage,
            });
            self.attack_timer_ms = self.config.attack_cooldown_ms;
        }
        action.phased = dark && input.pressed(InputFlags::ABILITY);

        self.attack_timer_ms = (self.attack_timer_ms - delta_ms).max(0.0);
        self.position = self.position + self.velocity.scale(delta_ms / 1000.0);
        action
    }

    /// Burns the shadow while it stands in strong light. Also drains player
    /// hp, more slowly. Returns whether any damage was dealt.
    pub fn apply_light_damage(
        &mut self,
        delta_ms: f32,
        light: f32,
        store: &mut StateStore,
    ) -> bool {
        if light <= self.config.burn_threshold {
            return false;
        }
        self.burn(delta_ms, light, store);
        true
    }

    /// Light damage applied when control switches to a shadow standing in
    /// light brighter than the swap threshold.
    pub fn apply_swap_burn(&mut self, light: f32, store: &mut StateStore) -> bool {
        if light <= self.config.swap_burn_threshold {
            return false;
        }
        self.burn(self.config.swap_burn_ms, light, store);
        true
    }

    fn burn(&mut self, delta_ms: f32, light: f32, store: &mut StateStore) {
        let exposure = delta_ms * light;
        self.health = (self.health - exposure / self.config.health_burn_divisor).max(0.0);
        let hp = (store.stat(StatKey::Hp) - exposure / self.config.hp_burn_divisor).max(0.0);
        store.update_stat(StatKey::Hp, hp);
    }
}
