//! Combat resolution: hostile registry, hitbox damage and contact detection.
//!
//! The resolver never touches player health. Contact between a body and a
//! hostile becomes a [`GameEvent::PlayerDamaged`] or
//! [`GameEvent::ShadowDamaged`] event and the caller decides what to do with
//! it.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::actor::BodyKind;
use crate::common::{EntityId, Rect, Vec2};
use crate::config::CombatConfig;
use crate::event::{EventQueue, GameEvent};
use crate::light::LightField;

/// Side length of every hostile's square hit bounds.
const ENEMY_SIZE: f32 = 8.0;

/// Time between Warden phase flips.
const WARDEN_PHASE_MS: f32 = 5000.0;

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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnemyKind {
    /// Thrives in light.
    Lightborn,
    /// Thrives in darkness.
    Nightborn,
    /// Boss alternating between a light and a dark phase.
    #[strum(to_string = "warden", serialize = "boss")]
    #[serde(alias = "boss")]
    Warden,
}

impl EnemyKind {
    pub fn max_health(self) -> f32 {
        match self {
            Self::Lightborn => 40.0,
            Self::Nightborn => 36.0,
            Self::Warden => 300.0,
        }
    }

    pub fn contact_damage(self) -> f32 {
        match self {
            Self::Lightborn => 12.0,
            Self::Nightborn => 10.0,
            Self::Warden => 14.0,
        }
    }

    pub fn base_speed(self) -> f32 {
        match self {
            Self::Lightborn => 60.0,
            Self::Nightborn => 70.0,
            Self::Warden => 40.0,
        }
    }
}

/// Which half of its cycle the Warden is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WardenPhase {
    Light,
    Dark,
}

/// A living hostile as plain data.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vec2,
    pub health: f32,
    phase: WardenPhase,
    phase_timer_ms: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            health: kind.max_health(),
            phase: WardenPhase::Light,
            // The first update flips the Warden into its dark phase.
            phase_timer_ms: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, ENEMY_SIZE, ENEMY_SIZE)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Applies damage and reports whether this hit was fatal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.health -= amount;
        was_alive && !self.is_alive()
    }

    pub fn contact_damage(&self) -> f32 {
        self.kind.contact_damage()
    }

    pub fn phase(&self) -> WardenPhase {
        self.phase
    }

    /// Movement speed at the given light level.
    pub fn speed(&self, light: f32) -> f32 {
        let base = self.kind.base_speed();
        match self.kind {
            EnemyKind::Lightborn if light > 0.5 => base * 1.6,
            EnemyKind::Lightborn => base * 0.5,
            EnemyKind::Nightborn if light < 0.4 => base * 1.8,
            EnemyKind::Nightborn => base * 0.5,
            EnemyKind::Warden => match self.phase {
                WardenPhase::Light if light > 0.4 => 80.0,
                WardenPhase::Light => 40.0,
                WardenPhase::Dark if light < 0.5 => 90.0,
                WardenPhase::Dark => 30.0,
            },
        }
    }

    /// Scales incoming damage by the light on this enemy. Only the Warden is
    /// sensitive: light doubles damage, darkness halves it.
    pub fn scaled_damage(&self, damage: f32, light: f32) -> f32 {
        match self.kind {
            EnemyKind::Warden if light > 0.5 => damage * 2.0,
            EnemyKind::Warden => damage * 0.5,
            _ => damage,
        }
    }

    fn advance_phase(&mut self, delta_ms: f32) {
        if self.kind != EnemyKind::Warden {
            return;
        }
        self.phase_timer_ms -= delta_ms;
        if self.phase_timer_ms <= 0.0 {
            self.phase = match self.phase {
                WardenPhase::Light => WardenPhase::Dark,
                WardenPhase::Dark => WardenPhase::Light,
            };
            self.phase_timer_ms = WARDEN_PHASE_MS;
        }
    }
}

/// Outcome of one [`CombatResolver::handle_attack`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackReport {
    /// Number of hostiles the hitbox overlapped.
    pub hits: usize,
    pub defeated: Vec<EntityId>,
}

/// Registry of living hostiles for the current level.
#[derive(Clone, Debug)]
pub struct CombatResolver {
    enemies: BTreeMap<EntityId, Enemy>,
    next_id: u32,
    player_contact_damage: f32,
    shadow_contact_damage: f32,
    contact_grace_ms: f32,
    player_grace_ms: f32,
    shadow_grace_ms: f32,
}

impl CombatResolver {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            enemies: BTreeMap::new(),
            next_id: 0,
            player_contact_damage: config.player_contact_damage,
            shadow_contact_damage: config.shadow_contact_damage,
            contact_grace_ms: config.contact_grace_ms,
            player_grace_ms: 0.0,
            shadow_grace_ms: 0.0,
        }
    }

    pub fn register_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        tracing::trace!(%id, kind = %enemy.kind, "registered enemy");
        self.enemies.insert(id, enemy);
        id
    }

    /// Removes a hostile and reports its defeat. Returns `false` when it was
    /// already gone, in which case nothing is emitted.
    pub fn destroy(&mut self, id: EntityId, events: &mut EventQueue) -> bool {
        let Some(enemy) = self.enemies.remove(&id) else {
            return false;
        };
        tracing::debug!(%id, kind = %enemy.kind, "enemy defeated");
        events.push(GameEvent::EnemyDefeated {
            enemy: id,
            kind: enemy.kind,
            position: enemy.position,
        });
        true
    }

    /// Damages every hostile overlapping `hitbox`.
    pub fn handle_attack(
        &mut self,
        hitbox: Rect,
        damage: f32,
        light: &LightField,
        events: &mut EventQueue,
    ) -> AttackReport {
        let mut report = AttackReport::default();
        for (id, enemy) in self.enemies.iter_mut() {
            if !hitbox.overlaps(&enemy.bounds()) {
                continue;
            }
            report.hits += 1;
            let amount = enemy.scaled_damage(damage, light.light_at(enemy.position));
            if enemy.take_damage(amount) {
                report.defeated.push(*id);
            }
        }
        for id in &report.defeated {
            self.destroy(*id, events);
        }
        report
    }

    /// Drops every hostile without defeat events (level teardown).
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.player_grace_ms = 0.0;
        self.shadow_grace_ms = 0.0;
    }

    /// Emits a fixed damage event when `body` touches any hostile. A body
    /// that was just hit is immune for the configured grace window.
    pub fn check_contact(&mut self, body: Rect, kind: BodyKind, events: &mut EventQueue) -> bool {
        let grace = match kind {
            BodyKind::Player => &mut self.player_grace_ms,
            BodyKind::Shadow => &mut self.shadow_grace_ms,
        };
        if *grace > 0.0 {
            return false;
        }
        let touching = self
            .enemies
            .values()
            .any(|enemy| body.overlaps(&enemy.bounds()));
        if !touching {
            return false;
        }
        *grace = self.contact_grace_ms;
        events.push(match kind {
            BodyKind::Player => GameEvent::PlayerDamaged {
                amount: self.player_contact_damage,
            },
            BodyKind::Shadow => GameEvent::ShadowDamaged {
                amount: self.shadow_contact_damage,
            },
        });
        true
    }

    /// Advances Warden phases and contact grace timers.
    pub fn update(&mut self, delta_ms: f32) {
        self.player_grace_ms = (self.player_grace_ms - delta_ms).max(0.0);
        self.shadow_grace_ms = (self.shadow_grace_ms - delta_ms).max(0.0);
        for enemy in self.enemies.values_mut() {
            enemy.advance_phase(delta_ms);
        }
    }

    /// Position of the first registered hostile, if any.
    pub fn enemy_target(&self) -> Option<Vec2> {
        self.enemies.values().next().map(|enemy| enemy.position)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Enemy)> {
        self.enemies.iter().map(|(id, enemy)| (*id, enemy))
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::new(&CombatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightSource;

    fn dark() -> LightField {
        LightField::new()
    }

    #[test]
    fn attack_damages_only_overlapping_enemies() {
        let mut combat = CombatResolver::default();
        let mut events = EventQueue::new();
        let near = combat.register_enemy(Enemy::new(EnemyKind::Lightborn, Vec2::new(10.0, 10.0)));
        let far = combat.register_enemy(Enemy::new(EnemyKind::Nightborn, Vec2::new(100.0, 100.0)));

        let hitbox = Rect::centered(Vec2::new(12.0, 10.0), 12.0, 12.0);
        let report = combat.handle_attack(hitbox, 10.0, &dark(), &mut events);

        assert_eq!(report.hits, 1);
        assert!(report.defeated.is_empty());
        assert_eq!(combat.enemy(near).unwrap().health, 30.0);
        assert_eq!(combat.enemy(far).unwrap().health, 36.0);
        assert!(events.is_empty());
    }

    #[test]
    fn lethal_attack_defeats_exactly_once() {
        let mut combat = CombatResolver::default();
        let mut events = EventQueue::new();
        let id = combat.register_enemy(Enemy::new(EnemyKind::Nightborn, Vec2::ZERO));
        let hitbox = Rect::centered(Vec2::ZERO, 16.0, 16.0);

        let report = combat.handle_attack(hitbox, 50.0, &dark(), &mut events);
        assert_eq!(report.defeated, vec![id]);
        assert!(combat.is_empty());
        assert!(!combat.destroy(id, &mut events));

        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        assert!(matches!(
            drained[0],
            GameEvent::EnemyDefeated { enemy, kind: EnemyKind::Nightborn, .. } if enemy == id
        ));
    }

    #[test]
    fn clear_emits_no_defeats() {
        let mut combat = CombatResolver::default();
        let mut events = EventQueue::new();
        combat.register_enemy(Enemy::new(EnemyKind::Lightborn, Vec2::ZERO));
        combat.register_enemy(Enemy::new(EnemyKind::Warden, Vec2::ZERO));
        combat.clear();
        assert!(combat.is_empty());
        assert!(combat.enemy_target().is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn contact_emits_fixed_damage_per_body() {
        let mut combat = CombatResolver::default();
        let mut events = EventQueue::new();
        combat.register_enemy(Enemy::new(EnemyKind::Lightborn, Vec2::new(20.0, 20.0)));
        let touching = Rect::centered(Vec2::new(24.0, 20.0), 8.0, 8.0);

        assert!(combat.check_contact(touching, BodyKind::Player, &mut events));
        assert!(combat.check_contact(touching, BodyKind::Shadow, &mut events));
        assert_eq!(
            events.drain(),
            vec![
                GameEvent::PlayerDamaged { amount: 10.0 },
                GameEvent::ShadowDamaged { amount: 8.0 },
            ]
        );

        let apart = Rect::centered(Vec2::new(80.0, 80.0), 8.0, 8.0);
        combat.update(1000.0);
        assert!(!combat.check_contact(apart, BodyKind::Player, &mut events));
    }

    #[test]
    fn contact_grace_suppresses_repeat_hits() {
        let mut combat = CombatResolver::default();
        let mut events = EventQueue::new();
        combat.register_enemy(Enemy::new(EnemyKind::Nightborn, Vec2::ZERO));
        let body = Rect::centered(Vec2::ZERO, 8.0, 8.0);

        assert!(combat.check_contact(body, BodyKind::Player, &mut events));
        combat.update(100.0);
        assert!(!combat.check_contact(body, BodyKind::Player, &mut events));
        combat.update(400.0);
        assert!(combat.check_contact(body, BodyKind::Player, &mut events));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn enemy_speed_reacts_to_light() {
        let lightborn = Enemy::new(EnemyKind::Lightborn, Vec2::ZERO);
        assert_eq!(lightborn.speed(0.8), 96.0);
        assert_eq!(lightborn.speed(0.2), 30.0);

        let nightborn = Enemy::new(EnemyKind::Nightborn, Vec2::ZERO);
        assert_eq!(nightborn.speed(0.1), 126.0);
        assert_eq!(nightborn.speed(0.9), 35.0);
    }

    #[test]
    fn warden_alternates_phase() {
        let mut combat = CombatResolver::default();
        let id = combat.register_enemy(Enemy::new(EnemyKind::Warden, Vec2::ZERO));
        assert_eq!(combat.enemy(id).unwrap().phase(), WardenPhase::Light);
        assert_eq!(combat.enemy(id).unwrap().speed(0.5), 80.0);

        combat.update(16.0);
        let warden = combat.enemy(id).unwrap();
        assert_eq!(warden.phase(), WardenPhase::Dark);
        assert_eq!(warden.speed(0.2), 90.0);
        assert_eq!(warden.speed(0.6), 30.0);

        combat.update(4999.0);
        assert_eq!(combat.enemy(id).unwrap().phase(), WardenPhase::Dark);
        combat.update(1.0);
        assert_eq!(combat.enemy(id).unwrap().phase(), WardenPhase::Light);
    }

    #[test]
    fn warden_takes_more_damage_in_light() {
        let mut combat = CombatResolver::default();
        let mut events = EventQueue::new();
        let id = combat.register_enemy(Enemy::new(EnemyKind::Warden, Vec2::new(50.0, 50.0)));
        let hitbox = Rect::centered(Vec2::new(50.0, 50.0), 12.0, 12.0);

        combat.handle_attack(hitbox, 10.0, &dark(), &mut events);
        assert_eq!(combat.enemy(id).unwrap().health, 295.0);

        let mut lit = LightField::new();
        lit.load_static_sources([LightSource::new(50.0, 50.0, 100.0, 1.0)]);
        combat.handle_attack(hitbox, 10.0, &lit, &mut events);
        assert_eq!(combat.enemy(id).unwrap().health, 275.0);
    }

    #[test]
    fn enemy_kind_parses_boss_alias() {
        assert_eq!("boss".parse::<EnemyKind>().unwrap(), EnemyKind::Warden);
        assert_eq!(
            "lightborn".parse::<EnemyKind>().unwrap(),
            EnemyKind::Lightborn
        );
        assert_eq!(EnemyKind::Warden.to_string(), "warden");
    }
}
