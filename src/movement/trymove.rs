//! The check → admit → commit pipeline: `try_move`, `check_position`,
//! `check_thing`, `check_line`.
//!
//! Directly generalizes the teacher's `xy_movement.rs` (`p_try_move`,
//! `p_check_position`, `pit_check_line`, `pit_check_thing`,
//! `line_opening`, `box_on_line_side`) out of its partial/TODO-laden
//! state into the full pipeline the original `P_CheckPositionXYZ`/
//! `PIT_CheckLine`/`PIT_CheckThing`/`P_TryMoveXY` (`p_map.cpp`)
//! implement.

use glam::Vec2;
use hecs::Entity;

use crate::config::Config;
use crate::defs::flags::MobjFlags;
use crate::interfaces::{Activation, GameRules};
use crate::mobj::components::{ActorFlags, Class, Position, Size, Subsector, Velocity};
use crate::mobj::grid::ThingSpatial;
use crate::mobj::table::MobjTable;
use crate::movement::context::MoveContext;
use crate::world::{box_on_line_side, Level, LineFlags, LineId};

/// Step height a mover may climb in a single move, matching the
/// original's `24*FRACUNIT`.
pub const STEP_HEIGHT: f32 = 24.0;
/// Largest radius any mobj type carries; used to expand the box query so
/// a thing whose origin is just outside the destination box but whose
/// radius still overlaps it is not missed.
pub const MAX_RADIUS: f32 = 32.0;

/// Attempt to relocate `ent` to `dest` in the XY plane. Returns `true`
/// and commits the move (unlink/relink, `spechit` crossing activation)
/// on success; returns `false` and leaves `ent` untouched otherwise.
pub fn try_move<R: GameRules>(
    level: &Level,
    table: &mut MobjTable,
    rules: &mut R,
    config: &Config,
    ent: Entity,
    dest: Vec2,
    allow_drop_off: bool,
) -> bool {
    let Ok((pos, flags, class, size, sub)) = table
        .world
        .query_one_mut::<(&Position, &ActorFlags, &Class, &Size, &Subsector)>(ent)
        .map(|(p, f, c, sz, s)| (*p, *f, *c, *sz, *s))
    else {
        return false;
    };

    let is_player = class.0.id == "PLAYER";
    let is_corpse = flags.0.contains(MobjFlags::CORPSE);

    let thing = ThingSpatial {
        ent,
        pos,
        class,
        flags,
        size,
    };

    let mut ctx = MoveContext::new(ent, dest, size.radius, pos.1, pos.1);
    let ok = check_position(level, table, rules, &thing, dest, config, is_player, is_corpse, &mut ctx);

    if !ok && !unstuck_escape(level, &thing, &ctx, is_player) {
        return false;
    }

    // Admit phase.
    if ctx.ceiling_z - ctx.floor_z < size.height {
        return false;
    }
    if ctx.ceiling_z - pos.1 < size.height {
        return false;
    }
    if !flags.0.contains(MobjFlags::FLOAT) && ctx.floor_z - pos.1 > STEP_HEIGHT {
        return false;
    }
    if !flags.0.contains(MobjFlags::DROPOFF)
        && !flags.0.contains(MobjFlags::FLOAT)
        && ctx.floor_z - ctx.dropoff_z > STEP_HEIGHT
    {
        if !allow_drop_off {
            return false;
        }
        ctx.fell_down = true;
    }

    // Commit phase.
    let old_pos = pos.0;
    table.grid.remove(&thing);
    let new_pos = Position(dest, pos.1);
    if let Ok(mut p) = table.world.get::<&mut Position>(ent) {
        *p = new_pos;
    }
    if let Ok(mut s) = table.world.get::<&mut Subsector>(ent) {
        s.0 = level.locate_subsector(dest);
    }
    table.grid.insert(ThingSpatial {
        ent,
        pos: new_pos,
        class,
        flags,
        size,
    });

    for line_id in ctx.spechit.iter().rev() {
        let line = &level.lines[line_id.index()];
        let v1 = level.vertices[line.v1.index()].pos;
        let old_side = box_on_line_side(old_pos, old_pos, v1, line.delta(&level.vertices));
        let new_side = box_on_line_side(dest, dest, v1, line.delta(&level.vertices));
        if old_side != new_side {
            rules.cross_special_line(*line_id, ent, old_side, Activation::Cross);
        }
    }

    true
}

/// Full collision check at `dest`: links nothing, only fills in `ctx`.
/// Returns `false` on an outright block (solid thing or one-sided/fully
/// blocking line); `true` otherwise (the opening may still be too
/// narrow — the caller's admit phase decides that).
#[allow(clippy::too_many_arguments)]
pub fn check_position<R: GameRules>(
    level: &Level,
    table: &MobjTable,
    rules: &mut R,
    thing: &ThingSpatial,
    dest: Vec2,
    config: &Config,
    is_player: bool,
    is_corpse: bool,
    ctx: &mut MoveContext,
) -> bool {
    let subsector = level.locate_subsector(dest);
    let sector = &level.sectors[level.sector_of_subsector(subsector).index()];
    ctx.floor_z = sector.floor.height;
    ctx.ceiling_z = sector.ceiling.height;
    ctx.dropoff_z = sector.floor.height;
    ctx.floor_material = sector.floor.material;

    if thing.flags.0.contains(MobjFlags::NOCLIP) {
        return true;
    }

    let expanded = ctx.bbox.expanded(MAX_RADIUS);
    let mut blocked = false;
    table.grid.for_each_in_bbox(expanded, |other| {
        if !check_thing(table, rules, config, thing, other, dest, is_player, ctx) {
            blocked = true;
            false
        } else {
            true
        }
    });
    if blocked {
        return false;
    }

    let mut blocked_by_line = false;
    level.blockmap.lines_in_bbox(ctx.bbox, |line_id| {
        if !check_line(level, &mut *ctx, line_id, thing, is_player) {
            blocked_by_line = true;
            false
        } else {
            true
        }
    });
    !blocked_by_line
}

/// Player-only escape hatch for a move `check_position` rejected purely
/// because of a blocking line: if that line doesn't actually overlap the
/// player's bounding box at its *current* (pre-move) position, the block
/// is spurious (a PWAD geometry error, typically) and the move is let
/// through rather than leaving the player stuck in place forever.
fn unstuck_escape(level: &Level, thing: &ThingSpatial, ctx: &MoveContext, is_player: bool) -> bool {
    if !is_player {
        return false;
    }
    let Some(line_id) = ctx.blocking_line else {
        return false;
    };
    let line = &level.lines[line_id.index()];
    let cur_min = thing.pos.0 - Vec2::splat(thing.size.radius);
    let cur_max = thing.pos.0 + Vec2::splat(thing.size.radius);
    let cur_bbox = crate::world::Aabb { min: cur_min, max: cur_max };
    if !cur_bbox.intersects(line.bbox) {
        return true;
    }
    let v1 = level.vertices[line.v1.index()].pos;
    let dir = line.delta(&level.vertices);
    box_on_line_side(cur_min, cur_max, v1, dir) != -1
}

/// One candidate from the `BoxIterator` thing query. Returns `true` to
/// keep iterating, `false` to stop the whole `check_position` call as
/// blocked.
#[allow(clippy::too_many_arguments)]
fn check_thing<R: GameRules>(
    table: &MobjTable,
    rules: &mut R,
    config: &Config,
    mover: &ThingSpatial,
    other: &ThingSpatial,
    dest: Vec2,
    is_player: bool,
    ctx: &mut MoveContext,
) -> bool {
    if other.ent == mover.ent {
        return true;
    }
    if !other
        .flags
        .0
        .intersects(MobjFlags::SOLID | MobjFlags::SPECIAL | MobjFlags::SHOOTABLE)
    {
        return true;
    }

    let block_dist = other.size.radius + mover.size.radius;
    if (other.pos.0.x - dest.x).abs() >= block_dist || (other.pos.0.y - dest.y).abs() >= block_dist
    {
        return true;
    }

    if mover.flags.0.contains(MobjFlags::PASSMOBJ) && other.flags.0.contains(MobjFlags::PASSMOBJ) {
        let mover_top = mover.pos.1 + mover.size.height;
        let other_top = other.pos.1 + other.size.height;
        if mover.pos.1 >= other_top || other.pos.1 >= mover_top {
            return true;
        }
    }

    if mover.flags.0.contains(MobjFlags::SKULLFLY) {
        if other.flags.0.contains(MobjFlags::SOLID) {
            rules.damage_mob(other.ent, Some(mover.ent), Some(mover.ent), mover.class.0.damage, false);
            return false;
        }
        return true;
    }

    if mover.flags.0.contains(MobjFlags::MISSILE) {
        if mover.pos.1 > other.pos.1 + other.size.height {
            return true;
        }
        if mover.pos.1 + mover.size.height < other.pos.1 {
            return true;
        }
        if std::ptr::eq(mover.class.0, other.class.0) {
            return true;
        }
        if !other.flags.0.contains(MobjFlags::SHOOTABLE) {
            return !other.flags.0.contains(MobjFlags::SOLID);
        }
        let dmg = mover.class.0.scale_damage(crate::defs::flags::DAMAGE_USE_DEFINITION);
        rules.damage_mob(other.ent, Some(mover.ent), Some(mover.ent), dmg, false);
        return false;
    }

    if other.flags.0.contains(MobjFlags::SPECIAL) {
        let solid = other.flags.0.contains(MobjFlags::SOLID);
        if mover.flags.0.contains(MobjFlags::PICKUP) {
            rules.touch_special(other.ent, mover.ent);
        }
        return !solid;
    }

    if other.flags.0.contains(MobjFlags::PUSHABLE) && !mover.flags.0.contains(MobjFlags::CANNOT_PUSH) {
        if let Ok(mover_vel) = table.world.get::<&Velocity>(mover.ent) {
            let mut push = Vec2::new(mover_vel.0.x, mover_vel.0.y) * 0.5;
            if config.pushable_momentum_limited_to_pusher {
                let cap = mover_vel.0.length();
                if push.length() > cap {
                    push = push.normalize_or_zero() * cap;
                }
            }
            if let Ok(mut other_vel) = table.world.get::<&mut Velocity>(other.ent) {
                other_vel.0.x += push.x;
                other_vel.0.y += push.y;
            }
        }
        return true;
    }

    if other.flags.0.contains(MobjFlags::SOLID) {
        let top = other.pos.1 + other.size.height;
        let can_step = (is_player && !mover.flags.0.contains(MobjFlags::CORPSE))
            || (config.allow_monster_float_over_blocking && mover.flags.0.contains(MobjFlags::FLOAT));
        if can_step && top - mover.pos.1 <= STEP_HEIGHT {
            ctx.floor_z = ctx.floor_z.max(top);
            ctx.on_mobj = Some(other.ent);
            return true;
        }
        return false;
    }

    true
}

/// One candidate from the blockmap line query. Returns `true` to keep
/// iterating, `false` to stop as blocked.
fn check_line(
    level: &Level,
    ctx: &mut MoveContext,
    line_id: LineId,
    mover: &ThingSpatial,
    is_player: bool,
) -> bool {
    let line = &level.lines[line_id.index()];
    if !ctx.bbox.intersects(line.bbox) {
        return true;
    }
    let v1 = level.vertices[line.v1.index()].pos;
    let dir = line.delta(&level.vertices);
    if box_on_line_side(ctx.bbox.min, ctx.bbox.max, v1, dir) != -1 {
        return true;
    }

    let is_missile = mover.flags.0.contains(MobjFlags::MISSILE);

    if !line.flags.contains(LineFlags::TWO_SIDED) || line.back_sector.is_none() {
        ctx.blocking_line = Some(line_id);
        return false;
    }
    if line.flags.contains(LineFlags::BLOCK_EVERYTHING) && is_missile {
        ctx.blocking_line = Some(line_id);
        return false;
    }
    if !is_missile {
        if line.flags.contains(LineFlags::IMPASSABLE) {
            ctx.blocking_line = Some(line_id);
            return false;
        }
        if !is_player && line.flags.contains(LineFlags::BLOCK_MONSTERS) {
            ctx.blocking_line = Some(line_id);
            return false;
        }
    }

    let opening = level.line_opening(line);
    if opening.top < ctx.ceiling_z {
        ctx.ceiling_z = opening.top;
        ctx.ceiling_line = Some(line_id);
    }
    if opening.bottom > ctx.floor_z {
        ctx.floor_z = opening.bottom;
        ctx.floor_line = Some(line_id);
    }
    if opening.lowest_floor < ctx.dropoff_z {
        ctx.dropoff_z = opening.lowest_floor;
    }
    if line.special != 0 {
        ctx.spechit.push(line_id);
    }
    true
}
