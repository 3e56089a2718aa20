//! Per-frame update.
use crate::actor::{AttackIntent, BodyKind};
use crate::combat::EnemyKind;
use crate::env::{ExitSpec, LevelHints, PuzzleKind};
use crate::event::GameEvent;
use crate::input::{InputFlags, InputSnapshot};
use crate::puzzle::{PUZZLE_QUEST, PuzzleSolved};
use crate::state::StatKey;

use super::Simulation;

/// Actions that fire once per press instead of every held frame.
const EDGE_TRIGGERED: InputFlags = InputFlags::INTERACT
    .union(InputFlags::SWAP)
    .union(InputFlags::LANTERN)
    .union(InputFlags::PAUSE)
    .union(InputFlags::INVENTORY)
    .union(InputFlags::ABILITY);

const DEFAULT_CURSE_APPLIED_HINT: &str = "Debt curse applied! Appease at a shrine.";
const DEFAULT_CURSE_CLEARED_HINT: &str = "Debt eased.";

/// Everything a presentation layer needs after one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Events in emission order.
    pub events: Vec<GameEvent>,
    /// Exit the player walked into, if any. The caller decides whether to
    /// follow it with [`Simulation::enter_level`].
    pub exit: Option<ExitSpec>,
    pub player_light: f32,
    pub shadow_light: f32,
    pub paused: bool,
}

impl Simulation {
    /// Advances the simulation by `delta_ms`.
    pub fn step(&mut self, input: &InputSnapshot, delta_ms: f32) -> FrameReport {
        let frame = self.resolve_input(input);

        if frame.pressed(InputFlags::PAUSE) {
            self.paused = !self.paused;
            tracing::debug!(paused = self.paused, "pause toggled");
        }
        if self.level.is_none() {
            tracing::warn!("step called before a level was entered");
        }
        if self.paused || self.level.is_none() {
            return FrameReport {
                events: self.events.drain(),
                paused: self.paused,
                ..FrameReport::default()
            };
        }

        if frame.pressed(InputFlags::INTERACT) && !self.dialogue.is_active() {
            self.interact();
        }
        if frame.pressed(InputFlags::LANTERN) {
            self.lantern_on = !self.lantern_on;
        }

        // Light is sampled before any actor uses it.
        self.place_lantern();
        let player_light = self.light.light_at(self.player.position);
        let shadow_light = self.light.light_at(self.shadow.position);

        if frame.pressed(InputFlags::SWAP) {
            self.try_swap(shadow_light);
        }

        self.update_actors(&frame, player_light, shadow_light, delta_ms);

        self.stamina.update(&mut self.store, delta_ms);
        let curses = self
            .debt
            .update(&mut self.store, delta_ms, &mut self.events);
        if curses.applied > 0 {
            let hint = self
                .level_hint(|hints| hints.curse_applied.as_deref())
                .unwrap_or(DEFAULT_CURSE_APPLIED_HINT)
                .to_owned();
            self.events.push(GameEvent::hint(hint));
        }
        if curses.cleared > 0 {
            let hint = self
                .level_hint(|hints| hints.curse_cleared.as_deref())
                .unwrap_or(DEFAULT_CURSE_CLEARED_HINT)
                .to_owned();
            self.events.push(GameEvent::hint(hint));
        }

        let solved = self
            .puzzles
            .update(&self.player.bounds(), &self.shadow.bounds());
        for puzzle in solved {
            self.complete_puzzle(puzzle);
        }
        let exit = self.find_exit();
        if let Some(exit) = &exit {
            self.events.push(GameEvent::ExitReached {
                exit: exit.id.clone(),
                target_scene: exit.target_scene.clone(),
                target_entry: exit.target_entry.clone(),
            });
        }

        self.events.push(GameEvent::HudRefresh);
        FrameReport {
            events: self.events.drain(),
            exit,
            player_light,
            shadow_light,
            paused: false,
        }
    }

    /// Masks edge-triggered actions down to their rising edge.
    fn resolve_input(&mut self, input: &InputSnapshot) -> InputSnapshot {
        let rising = input.actions.difference(self.previous_input.actions);
        let actions =
            input.actions.difference(EDGE_TRIGGERED) | rising.intersection(EDGE_TRIGGERED);
        self.previous_input = *input;
        InputSnapshot {
            actions,
            aim: input.aim,
        }
    }

    fn place_lantern(&mut self) {
        let lantern = &self.config.lantern;
        if self.lantern_on {
            let radius = self
                .level
                .as_ref()
                .and_then(|level| level.descriptor.lantern_radius)
                .unwrap_or(lantern.radius);
            let position = self.player.position;
            self.light
                .set_lantern_position(position.x, position.y, radius, lantern.intensity);
        } else {
            let parked = lantern.off_position;
            self.light
                .set_lantern_position(parked.x, parked.y, lantern.off_radius, 0.0);
        }
    }

    fn update_actors(
        &mut self,
        frame: &InputSnapshot,
        player_light: f32,
        shadow_light: f32,
        delta_ms: f32,
    ) {
        if let Some(attack) = self
            .player
            .update(frame, player_light, delta_ms, &mut self.store)
        {
            self.resolve_attack(attack);
        }

        let action = self.shadow.update(frame, shadow_light, delta_ms);
        if let Some(attack) = action.attack {
            self.resolve_attack(attack);
        }
        if action.phased {
            self.on_shadow_phase();
        }
        self.shadow
            .apply_light_damage(delta_ms, shadow_light, &mut self.store);

        self.combat.update(delta_ms);
        let first_new = self.events.len();
        self.combat
            .check_contact(self.player.bounds(), BodyKind::Player, &mut self.events);
        self.combat
            .check_contact(self.shadow.bounds(), BodyKind::Shadow, &mut self.events);
        self.apply_contact_damage(first_new);
    }

    fn resolve_attack(&mut self, attack: AttackIntent) {
        let first_new = self.events.len();
        let report =
            self.combat
                .handle_attack(attack.hitbox, attack.damage, &self.light, &mut self.events);
        if report.defeated.is_empty() {
            return;
        }
        let warden_down = self.events.iter().skip(first_new).any(|event| {
            matches!(
                event,
                GameEvent::EnemyDefeated {
                    kind: EnemyKind::Warden,
                    ..
                }
            )
        });
        if warden_down {
            self.store.set_flag("warden_defeated", true);
            if let Some(hint) = self
                .level_hint(|hints| hints.boss_defeated.as_deref())
                .map(str::to_owned)
            {
                self.events.push(GameEvent::hint(hint));
            }
        }
    }

    fn on_shadow_phase(&mut self) {
        let Some(level) = &self.level else {
            return;
        };
        let bonus = level.descriptor.phase_debt_bonus;
        let maze = level.descriptor.has_puzzle(PuzzleKind::ShadowMaze);
        self.debt
            .increase(&mut self.store, self.config.debt.phase_cost + bonus);
        if maze && let Some(puzzle) = self.puzzles.on_shadow_phase() {
            self.events
                .push(GameEvent::hint("Shadow phased through barrier!"));
            self.complete_puzzle(puzzle);
        }
    }

    /// Player hits cost the full amount; shadow hits cost half.
    fn apply_contact_damage(&mut self, first_new: usize) {
        let mut loss = 0.0;
        let mut player_hit = false;
        for event in self.events.iter().skip(first_new) {
            match event {
                GameEvent::PlayerDamaged { amount } => {
                    loss += amount;
                    player_hit = true;
                }
                GameEvent::ShadowDamaged { amount } => loss += amount / 2.0,
                _ => {}
            }
        }
        if loss <= 0.0 {
            return;
        }
        let hp = self.store.stat(StatKey::Hp);
        self.store.update_stat(StatKey::Hp, (hp - loss).max(0.0));
        if player_hit {
            self.events.push(GameEvent::hint("You were hit!"));
        }
    }

    fn complete_puzzle(&mut self, puzzle: PuzzleSolved) {
        tracing::debug!(?puzzle, "puzzle solved");
        if let Err(err) = self.quests.mark_objective(
            &mut self.store,
            PUZZLE_QUEST,
            puzzle.objective(),
            &mut self.events,
        ) {
            tracing::debug!(?puzzle, "objective not recorded: {err}");
        }
    }

    fn find_exit(&self) -> Option<ExitSpec> {
        let level = self.level.as_ref()?;
        let body = self.player.bounds();
        let size = self.config.interaction.exit_size;
        level
            .descriptor
            .exits
            .iter()
            .find(|exit| exit.zone(size).overlaps(&body))
            .cloned()
    }

    fn level_hint<'a>(
        &'a self,
        pick: impl FnOnce(&'a LevelHints) -> Option<&'a str>,
    ) -> Option<&'a str> {
        self.level
            .as_ref()
            .and_then(|level| pick(&level.descriptor.hints))
    }
}
