//! Light field: illumination sampled at world positions.
//!
//! Sources never stack. The brightest single contribution at a point wins,
//! which keeps light readable where several sources overlap.
use serde::{Deserialize, Serialize};

use crate::common::Vec2;

/// Circular light with linear falloff to zero at `radius`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Brightness at the center, in `[0, 1]`.
    pub intensity: f32,
}

impl LightSource {
    pub const fn new(x: f32, y: f32, radius: f32, intensity: f32) -> Self {
        Self {
            x,
            y,
            radius,
            intensity,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Light this source casts on `(x, y)`; zero at or beyond the radius.
    pub fn contribution_at(&self, x: f32, y: f32) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let distance = self.position().distance(Vec2::new(x, y));
        if distance >= self.radius {
            return 0.0;
        }
        self.intensity * (1.0 - distance / self.radius)
    }
}

/// Static level sources plus the single movable lantern.
#[derive(Clone, Debug)]
pub struct LightField {
    sources: Vec<LightSource>,
    lantern: Option<LightSource>,
    enabled: bool,
}

impl LightField {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            lantern: None,
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replaces the fixed sources of the current level.
    pub fn load_static_sources(&mut self, sources: impl IntoIterator<Item = LightSource>) {
        self.sources = sources
            .into_iter()
            .filter(|source| {
                let valid = source.radius > 0.0;
                if !valid {
                    tracing::warn!(?source, "ignoring light source with non-positive radius");
                }
                valid
            })
            .collect();
    }

    pub fn static_sources(&self) -> &[LightSource] {
        &self.sources
    }

    /// Appends one fixed source and returns its slot.
    pub fn push_static_source(&mut self, source: LightSource) -> usize {
        self.sources.push(source);
        self.sources.len() - 1
    }

    /// Moves an existing fixed source. Unknown slots are ignored.
    pub fn replace_static_source(&mut self, slot: usize, source: LightSource) {
        if let Some(existing) = self.sources.get_mut(slot) {
            *existing = source;
        }
    }

    /// Replaces the dynamic lantern source. Park it off-map with zero
    /// intensity to switch it off.
    pub fn set_lantern_position(&mut self, x: f32, y: f32, radius: f32, intensity: f32) {
        self.lantern = Some(LightSource::new(x, y, radius, intensity));
    }

    pub fn lantern(&self) -> Option<&LightSource> {
        self.lantern.as_ref()
    }

    /// Illumination at `(x, y)` in `[0, 1]`.
    pub fn light_level(&self, x: f32, y: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        self.sources
            .iter()
            .chain(self.lantern.iter())
            .map(|source| source.contribution_at(x, y))
            .fold(0.0_f32, f32::max)
            .clamp(0.0, 1.0)
    }

    pub fn light_at(&self, point: Vec2) -> f32 {
        self.light_level(point.x, point.y)
    }
}

impl Default for LightField {
    fn default() -> Self {
        Self::new()
    }
}
