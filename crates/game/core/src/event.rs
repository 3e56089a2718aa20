//! Events emitted by the simulation for the presentation layer.
//!
//! Systems push into an [`EventQueue`] handed to them by the caller; the frame
//! engine drains the queue once per step. Nothing here depends on an event
//! loop, so the queue can be forwarded to any transport (see the runtime's
//! topic bus).
use serde::{Deserialize, Serialize};

use crate::combat::EnemyKind;
use crate::common::{EntityId, Vec2};
use crate::debt::CurseId;

/// High-level occurrences produced during a simulation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Debt crossed a curse threshold upwards.
    CurseApplied { curse: CurseId },

    /// Debt fell back below a curse threshold.
    CurseCleared { curse: CurseId },

    /// A registered hostile was destroyed.
    EnemyDefeated {
        enemy: EntityId,
        kind: EnemyKind,
        position: Vec2,
    },

    /// The player body touched a hostile.
    PlayerDamaged { amount: f32 },

    /// The shadow body touched a hostile.
    ShadowDamaged { amount: f32 },

    /// A quest was activated or one of its objectives changed.
    QuestProgressChanged {
        quest: String,
        completed: usize,
        total: usize,
        done: bool,
    },

    /// Free-form hint text for the HUD.
    Hint(String),

    /// The player walked into a scene exit.
    ExitReached {
        exit: String,
        target_scene: String,
        target_entry: String,
    },

    /// Stats changed; the HUD should redraw.
    HudRefresh,
}

impl GameEvent {
    pub fn hint(text: impl Into<String>) -> Self {
        Self::Hint(text.into())
    }
}

/// FIFO buffer of pending events.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Removes and returns every pending event in emission order.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
