//! Per-mobj ECS components.
//!
//! Kept close to the teacher's `sim/components.rs`: world position split
//! into an XY `Vec2` and a separate Z (matching the original's 2½-D
//! representation, where floor-clip and step checks treat height
//! differently from planar movement), plus thin wrappers so collision
//! code can query `&MobjFlags`/`&'static MobjInfo` without touching the
//! rest of a mobj's state.

use glam::{Vec2, Vec3};

use crate::defs::{MobjFlags, MobjInfo, State};
use crate::world::SubsectorId;

/// World-space position. Z is tracked apart from XY to match Doom's
/// 2½-D physics (floors/ceilings/step-height all operate on it alone).
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2, pub f32);

#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec3);

impl Velocity {
    #[inline]
    pub fn zero_xy(&mut self) {
        self.0.x = 0.0;
        self.0.y = 0.0;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Angle(pub f32);

#[derive(Debug, Clone, Copy)]
pub struct Subsector(pub SubsectorId);

#[derive(Debug, Copy, Clone)]
pub struct Class(pub &'static MobjInfo);

/// Per-instance override of a mobj's collision radius/height. Seeded
/// from [`Class`] at spawn time; diverges from it when something
/// shrinks an individual mobj rather than its whole type — a crushed
/// corpse flattened to `radius=0, height=0` for example.
#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub radius: f32,
    pub height: f32,
}

impl Size {
    pub fn of(info: &MobjInfo) -> Size {
        Size {
            radius: info.radius,
            height: info.height,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Animation {
    pub state: State,
    pub tics: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct ActorFlags(pub MobjFlags);

/// Current health; mobjs at or below zero enter their death sequence.
#[derive(Clone, Copy, Debug)]
pub struct Health(pub i32);

/// Per-tic player input, sampled once and consumed by the movement
/// system. Analogue of the original's `ticcmd_t`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
    pub run: bool,
    pub fire: bool,
    pub use_act: bool,
}
