//! Per-frame input snapshot supplied by the presentation layer.
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::common::Vec2;

bitflags! {
    /// Actions held down during one frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct InputFlags: u16 {
        const LEFT      = 1 << 0;
        const RIGHT     = 1 << 1;
        const UP        = 1 << 2;
        const DOWN      = 1 << 3;
        const DASH      = 1 << 4;
        const ATTACK    = 1 << 5;
        const INTERACT  = 1 << 6;
        const SWAP      = 1 << 7;
        const LANTERN   = 1 << 8;
        const INVENTORY = 1 << 9;
        const PAUSE     = 1 << 10;
        const ABILITY   = 1 << 11;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub actions: InputFlags,
    /// World-space aim coordinate.
    pub aim: Vec2,
}

impl InputSnapshot {
    pub fn new(actions: InputFlags) -> Self {
        Self {
            actions,
            aim: Vec2::ZERO,
        }
    }

    pub fn with_aim(mut self, aim: Vec2) -> Self {
        self.aim = aim;
        self
    }

    pub fn pressed(&self, flag: InputFlags) -> bool {
        self.actions.contains(flag)
    }

    /// True when `flag` is held now but was not in `previous`.
    pub fn just_pressed(&self, previous: &InputSnapshot, flag: InputFlags) -> bool {
        self.pressed(flag) && !previous.pressed(flag)
    }

    /// Unnormalized movement axis, each component in `{-1, 0, 1}`.
    pub fn movement(&self) -> Vec2 {
        let axis = |negative: InputFlags, positive: InputFlags| {
            f32::from(i8::from(self.pressed(positive)) - i8::from(self.pressed(negative)))
        };
        Vec2::new(
            axis(InputFlags::LEFT, InputFlags::RIGHT),
            axis(InputFlags::UP, InputFlags::DOWN),
        )
    }
}

impl From<InputFlags> for InputSnapshot {
    fn from(actions: InputFlags) -> Self {
        Self::new(actions)
    }
}
