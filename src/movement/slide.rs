//! Wall-sliding: when a straight `try_move` is blocked, trace the
//! leading corners of the mover's bounding square to find the nearest
//! blocking line, advance up to it, then project the remaining motion
//! onto the wall's tangent and retry.
//!
//! Grounded in `P_SlideMove` (`p_map.cpp`); the teacher's
//! `sim/collision.rs::slide_move` only stops dead at the first blocked
//! axis, so this replaces it rather than generalizing it.

use glam::Vec2;
use hecs::Entity;

use crate::config::Config;
use crate::interfaces::GameRules;
use crate::mobj::components::{Class, Position, Size, Velocity};
use crate::mobj::table::MobjTable;
use crate::movement::trymove::try_move;
use crate::world::{Level, LineId, SlopeType};

/// Fudge factor pulled back from the blocking line before projecting,
/// matching the original's `FRACUNIT/32`.
const WALL_FUDGE: f32 = 1.0 / 32.0;
const MAX_SLIDE_ITERATIONS: usize = 3;

/// Apply a best-effort slide for `ent`'s current velocity, committing
/// whatever portion of the move succeeds and leaving the remainder in
/// `Velocity` for the next tic's straight `try_move` to consume.
pub fn slide_move<R: GameRules>(level: &Level, table: &mut MobjTable, rules: &mut R, config: &Config, ent: Entity) {
    let Ok((size, vel)) = table
        .world
        .query_one_mut::<(&Size, &Velocity)>(ent)
        .map(|(s, v)| (*s, *v))
    else {
        return;
    };

    let mut remaining = Vec2::new(vel.0.x, vel.0.y);
    if remaining == Vec2::ZERO {
        return;
    }

    for _ in 0..MAX_SLIDE_ITERATIONS {
        let Ok(cur) = table.world.get::<&Position>(ent).map(|p| p.0) else {
            return;
        };
        let dest = cur + remaining;
        if try_move(level, table, rules, config, ent, dest, false) {
            return;
        }

        let Some((frac, line_id)) = nearest_blocking_line(level, cur, remaining, size.radius) else {
            stairstep_fallback(level, table, rules, config, ent, remaining);
            zero_xy_velocity(table, ent);
            return;
        };

        let advance = (frac - WALL_FUDGE).max(0.0);
        let partial = remaining * advance;
        let partial_dest = cur + partial;
        try_move(level, table, rules, config, ent, partial_dest, false);

        let line = &level.lines[line_id.index()];
        let leftover = remaining * (1.0 - advance);
        remaining = project_onto_wall(leftover, line, level);

        if remaining.length_squared() < 1e-6 {
            zero_xy_velocity(table, ent);
            return;
        }
    }

    zero_xy_velocity(table, ent);
}

fn project_onto_wall(leftover: Vec2, line: &crate::world::Line, level: &Level) -> Vec2 {
    match line.slope_type {
        SlopeType::Horizontal => Vec2::new(leftover.x, 0.0),
        SlopeType::Vertical => Vec2::new(0.0, leftover.y),
        _ => {
            let tangent = line.delta(&level.vertices).normalize_or_zero();
            tangent * leftover.dot(tangent)
        }
    }
}

fn zero_xy_velocity(table: &mut MobjTable, ent: Entity) {
    if let Ok(mut v) = table.world.get::<&mut Velocity>(ent) {
        v.zero_xy();
    }
}

/// Trace the three forward-leading corners of a `radius`-square centered
/// at `origin` along `delta`, returning the smallest-fraction blocking
/// line found across all three.
fn nearest_blocking_line(level: &Level, origin: Vec2, delta: Vec2, radius: f32) -> Option<(f32, LineId)> {
    let lead_x = if delta.x >= 0.0 { radius } else { -radius };
    let lead_y = if delta.y >= 0.0 { radius } else { -radius };
    let corners = [
        Vec2::new(origin.x + lead_x, origin.y + radius),
        Vec2::new(origin.x + lead_x, origin.y - radius),
        Vec2::new(origin.x + radius, origin.y + lead_y),
    ];

    let mut best: Option<(f32, LineId)> = None;
    for corner in corners {
        if let Some(hit) = first_blocking_line(level, corner, corner + delta) {
            if best.map_or(true, |(f, _)| hit.0 < f) {
                best = Some(hit);
            }
        }
    }
    best
}

fn first_blocking_line(level: &Level, p1: Vec2, p2: Vec2) -> Option<(f32, LineId)> {
    let mut result = None;
    level.traverse_lines(p1, p2, |line_id, t| {
        let line = &level.lines[line_id.index()];
        if is_blocking(level, line) {
            result = Some((t, line_id));
            false
        } else {
            true
        }
    });
    result
}

fn is_blocking(level: &Level, line: &crate::world::Line) -> bool {
    use crate::world::LineFlags;
    if !line.flags.contains(LineFlags::TWO_SIDED) || line.back_sector.is_none() {
        return true;
    }
    if line.flags.contains(LineFlags::BLOCK_EVERYTHING) {
        return true;
    }
    let opening = level.line_opening(line);
    opening.range <= 0.0 || opening.bottom - opening.lowest_floor > crate::movement::trymove::STEP_HEIGHT
}

/// Defensive fallback when the corner trace finds nothing blocking but a
/// straight move still failed (tight interior corners the 3-point sample
/// can miss): retry each axis alone.
fn stairstep_fallback<R: GameRules>(
    level: &Level,
    table: &mut MobjTable,
    rules: &mut R,
    config: &Config,
    ent: Entity,
    remaining: Vec2,
) {
    let Ok(cur) = table.world.get::<&Position>(ent).map(|p| p.0) else {
        return;
    };
    try_move(level, table, rules, config, ent, cur + Vec2::new(remaining.x, 0.0), false);
    let Ok(cur) = table.world.get::<&Position>(ent).map(|p| p.0) else {
        return;
    };
    try_move(level, table, rules, config, ent, cur + Vec2::new(0.0, remaining.y), false);
}
