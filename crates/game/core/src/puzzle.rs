//! Level puzzles and the objectives they complete.
use serde::{Deserialize, Serialize};

use crate::common::{Rect, Vec2};
use crate::env::{PuzzleKind, PuzzleSpec};
use crate::light::{LightField, LightSource};

/// Quest whose objectives the puzzles advance.
pub const PUZZLE_QUEST: &str = "dungeon_clear";

const MIRROR_STEP_DEGREES: u32 = 15;
const DEFAULT_MIRROR_ANGLE: u32 = 45;
const GATE_WIDTH: f32 = 32.0;
const GATE_HEIGHT: f32 = 16.0;
const PLATE_SIZE: f32 = 16.0;
const DEFAULT_LAMP_RADIUS: f32 = 80.0;
const DEFAULT_LAMP_STEP: f32 = 15.0;

/// A puzzle that was just solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleSolved {
    MirrorAligned,
    PlatesPressed,
    ShadowPhased,
}

impl PuzzleSolved {
    /// Objective of [`PUZZLE_QUEST`] this puzzle completes.
    pub fn objective(self) -> usize {
        match self {
            Self::MirrorAligned => 0,
            Self::PlatesPressed => 1,
            Self::ShadowPhased => 2,
        }
    }
}

/// Mirror rotating in fixed steps. Aligned on any multiple of 90 degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct MovableMirror {
    pub position: Vec2,
    angle: u32,
}

impl MovableMirror {
    pub fn new(position: Vec2, angle: u32) -> Self {
        Self {
            position,
            angle: angle % 360,
        }
    }

    pub fn rotate(&mut self) {
        self.angle = (self.angle + MIRROR_STEP_DEGREES) % 360;
    }

    pub fn angle(&self) -> u32 {
        self.angle
    }

    pub fn is_aligned(&self) -> bool {
        self.angle % 90 == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightGate {
    pub bounds: Rect,
    open: bool,
}

impl LightGate {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            open: false,
        }
    }

    /// Opens the gate; returns `false` if it was already open.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Plate that latches once the player and the shadow stand on it together.
#[derive(Clone, Debug, PartialEq)]
pub struct PressurePlate {
    pub bounds: Rect,
    activated: bool,
}

impl PressurePlate {
    pub fn new(center: Vec2) -> Self {
        Self {
            bounds: Rect::centered(center, PLATE_SIZE, PLATE_SIZE),
            activated: false,
        }
    }

    /// Returns `true` on the frame the plate latches.
    pub fn check_activation(&mut self, player: &Rect, shadow: &Rect) -> bool {
        if self.activated {
            return false;
        }
        self.activated = self.bounds.overlaps(player) && self.bounds.overlaps(shadow);
        self.activated
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }
}

/// Lamp orbiting its anchor at half its radius.
#[derive(Clone, Debug, PartialEq)]
pub struct RotatingLamp {
    pub anchor: Vec2,
    pub radius: f32,
    pub intensity: f32,
    pub step_degrees: f32,
    angle: f32,
    slot: usize,
}

impl RotatingLamp {
    /// Places the lamp's light into `light` and remembers its slot.
    pub fn install(
        anchor: Vec2,
        radius: f32,
        intensity: f32,
        step_degrees: f32,
        light: &mut LightField,
    ) -> Self {
        let mut lamp = Self {
            anchor,
            radius,
            intensity,
            step_degrees,
            angle: 0.0,
            slot: 0,
        };
        lamp.slot = light.push_static_source(lamp.source());
        lamp
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Light cast at the current angle.
    pub fn source(&self) -> LightSource {
        let radians = self.angle.to_radians();
        let offset = Vec2::new(radians.cos(), radians.sin()).scale(self.radius / 2.0);
        let center = self.anchor + offset;
        LightSource::new(center.x, center.y, self.radius, self.intensity)
    }

    pub fn rotate(&mut self, light: &mut LightField) {
        self.angle = (self.angle + self.step_degrees) % 360.0;
        light.replace_static_source(self.slot, self.source());
    }
}

/// Every puzzle in the current level.
#[derive(Clone, Debug, Default)]
pub struct PuzzleBoard {
    mirrors: Vec<(MovableMirror, LightGate)>,
    plates: Vec<PressurePlate>,
    plate_gate: Option<LightGate>,
    lamps: Vec<RotatingLamp>,
    shrine: Option<Vec2>,
    phase_solved: bool,
}

impl PuzzleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the board for a level. Lamps register their light in `light`.
    pub fn from_specs(specs: &[PuzzleSpec], light: &mut LightField) -> Self {
        let mut board = Self::new();
        for spec in specs {
            let origin = Vec2::new(spec.x, spec.y);
            match spec.kind {
                PuzzleKind::MirrorCorridor => {
                    let mirror = MovableMirror::new(
                        origin,
                        spec.options.initial_angle.unwrap_or(DEFAULT_MIRROR_ANGLE),
                    );
                    let gate_center = Vec2::new(spec.x + 16.0, spec.y);
                    let gate = LightGate::new(Rect::centered(gate_center, GATE_WIDTH, GATE_HEIGHT));
                    board.mirrors.push((mirror, gate));
                }
                PuzzleKind::PressurePlates => {
                    board.plates.push(PressurePlate::new(origin));
                    board
                        .plates
                        .push(PressurePlate::new(Vec2::new(spec.x + PLATE_SIZE, spec.y)));
                    let gate_center = Vec2::new(
                        spec.options.gate_x.unwrap_or(spec.x),
                        spec.options.gate_y.unwrap_or(spec.y),
                    );
                    board.plate_gate = Some(LightGate::new(Rect::centered(
                        gate_center,
                        GATE_WIDTH,
                        GATE_HEIGHT,
                    )));
                }
                PuzzleKind::RotatingLamp => {
                    board.lamps.push(RotatingLamp::install(
                        origin,
                        spec.options.radius.unwrap_or(DEFAULT_LAMP_RADIUS),
                        spec.options.intensity.unwrap_or(1.0),
                        spec.options.step.unwrap_or(DEFAULT_LAMP_STEP),
                        light,
                    ));
                }
                PuzzleKind::Shrine => board.shrine = Some(origin),
                PuzzleKind::ShadowMaze => {}
            }
        }
        board
    }

    /// Latches plates and opens gates. Each puzzle is reported once.
    pub fn update(&mut self, player: &Rect, shadow: &Rect) -> Vec<PuzzleSolved> {
        let mut solved = Vec::new();
        for (mirror, gate) in &mut self.mirrors {
            if mirror.is_aligned() && gate.open() {
                solved.push(PuzzleSolved::MirrorAligned);
            }
        }
        let mut pressed = false;
        for plate in &mut self.plates {
            pressed |= plate.check_activation(player, shadow);
        }
        if pressed && let Some(gate) = &mut self.plate_gate && gate.open() {
            solved.push(PuzzleSolved::PlatesPressed);
        }
        solved
    }

    /// Records a shadow phase. Only the first one counts.
    pub fn on_shadow_phase(&mut self) -> Option<PuzzleSolved> {
        if std::mem::replace(&mut self.phase_solved, true) {
            return None;
        }
        Some(PuzzleSolved::ShadowPhased)
    }

    /// Turns every lamp one step.
    pub fn rotate_lamps(&mut self, light: &mut LightField) -> bool {
        for lamp in &mut self.lamps {
            lamp.rotate(light);
        }
        !self.lamps.is_empty()
    }

    pub fn rotate_mirror(&mut self, index: usize) -> bool {
        match self.mirrors.get_mut(index) {
            Some((mirror, _)) => {
                mirror.rotate();
                true
            }
            None => false,
        }
    }

    pub fn mirrors(&self) -> impl Iterator<Item = &MovableMirror> {
        self.mirrors.iter().map(|(mirror, _)| mirror)
    }

    pub fn gates(&self) -> impl Iterator<Item = &LightGate> {
        self.mirrors
            .iter()
            .map(|(_, gate)| gate)
            .chain(self.plate_gate.iter())
    }

    pub fn plates(&self) -> &[PressurePlate] {
        &self.plates
    }

    pub fn lamps(&self) -> &[RotatingLamp] {
        &self.lamps
    }

    pub fn has_shrine(&self) -> bool {
        self.shrine.is_some()
    }
}
