//! Elastic wall bounce for projectiles carrying `MobjFlags::BOUNCES`.
//!
//! Grounded in `P_BounceWall` (`p_map.cpp`), which rotates the missile's
//! momentum by `2*lineAngle - moveAngle` and scales it down; expressed
//! here as a vector reflection about the line's normal, which is the
//! same transform without needing a BAM angle table.

use hecs::Entity;

use crate::mobj::components::Velocity;
use crate::mobj::table::MobjTable;
use crate::world::{Level, Line};

/// Momentum retained per bounce, matching the original's `FRACUNIT*15/16`
/// trimmed slightly harder so repeated bounces settle out.
pub const BOUNCE_FRICTION: f32 = 0.75;

/// Reflects `ent`'s XY velocity off `line`'s surface and scales it by
/// [`BOUNCE_FRICTION`]. No-op if the mobj has no velocity component.
pub fn bounce_wall(level: &Level, table: &mut MobjTable, ent: Entity, line: &Line) {
    let Ok(mut vel) = table.world.get::<&mut Velocity>(ent) else {
        return;
    };
    let dir = line.delta(&level.vertices);
    let normal = glam::Vec2::new(-dir.y, dir.x).normalize_or_zero();
    if normal == glam::Vec2::ZERO {
        return;
    }
    let v = glam::Vec2::new(vel.0.x, vel.0.y);
    let reflected = (v - 2.0 * v.dot(normal) * normal) * BOUNCE_FRICTION;
    vel.0.x = reflected.x;
    vel.0.y = reflected.y;
}
