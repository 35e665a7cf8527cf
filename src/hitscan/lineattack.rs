//! `LineAttack`: the damage-dealing hitscan, as opposed to `AimLineAttack`'s
//! read-only slope search.

use glam::Vec2;
use hecs::Entity;

use crate::config::Config;
use crate::defs::flags::MobjFlags;
use crate::defs::MobjInfo;
use crate::hitscan::{collect_intercepts, eye_height, Intercept};
use crate::interfaces::GameRules;
use crate::mobj::components::{ActorFlags, Class, Position, Size};
use crate::mobj::table::MobjTable;
use crate::world::{Level, LineFlags};

/// Pulled back from a wall/mobj impact point before spawning the puff,
/// matching the original's small epsilon backoff.
const BACKOFF: f32 = 4.0;
/// Number of times the backoff doubles while hunting for a point still
/// inside the hit subsector's floor/ceiling envelope (dead-end corners).
const MAX_BACKOFF_DOUBLINGS: u32 = 4;

/// Fires a single hitscan shot. Returns the mobj hit, if any; always
/// spawns a puff or blood mob at the impact point (suppressed only for
/// sky-textured surfaces, which this crate does not model — material
/// classification is a renderer concern).
#[allow(clippy::too_many_arguments)]
pub fn line_attack<R: GameRules>(
    level: &Level,
    table: &mut MobjTable,
    rules: &mut R,
    config: &Config,
    shooter: Entity,
    angle: f32,
    range: f32,
    slope: f32,
    damage: i32,
    puff_type: &'static MobjInfo,
) -> Option<Entity> {
    let Ok(mut query) = table.world.query_one::<(&Position, &Class)>(shooter) else {
        return None;
    };
    let Some((pos, class)) = query.get().map(|(p, c)| (*p, *c)) else {
        return None;
    };
    drop(query);

    let is_player = class.0.id == "PLAYER";
    let shooter_z = pos.1 + eye_height(class.0, is_player, config);
    let dir = Vec2::new(angle.cos(), angle.sin());
    let p1 = pos.0;
    let p2 = pos.0 + dir * range;

    for intercept in collect_intercepts(level, table, p1, p2, shooter) {
        match intercept {
            Intercept::Line(line_id, t) => {
                let line = &level.lines[line_id.index()];
                let dist = (t * range).max(1.0);
                let z = shooter_z + slope * dist;
                let one_sided = !line.flags.contains(LineFlags::TWO_SIDED) || line.back_sector.is_none();
                if one_sided {
                    spawn_impact(level, table, rules, puff_type, p1, dir, t * range, z);
                    return None;
                }
                let opening = level.line_opening(line);
                if z <= opening.bottom || z >= opening.top {
                    spawn_impact(level, table, rules, puff_type, p1, dir, t * range, z);
                    return None;
                }
            }
            Intercept::Thing(ent, t) => {
                if ent == shooter {
                    continue;
                }
                let Ok(mut query) = table.world.query_one::<(&Position, &Size, &ActorFlags)>(ent) else {
                    continue;
                };
                let Some((tpos, tsize, tflags)) = query.get().map(|(p, s, f)| (*p, *s, *f)) else {
                    continue;
                };
                drop(query);
                if !tflags.0.contains(MobjFlags::SHOOTABLE) {
                    continue;
                }
                let dist = (t * range).max(1.0);
                let z = shooter_z + slope * dist;
                if z < tpos.1 || z > tpos.1 + tsize.height {
                    continue;
                }
                spawn_impact(level, table, rules, puff_type, p1, dir, t * range, z);
                rules.damage_mob(ent, Some(shooter), Some(shooter), damage, false);
                return Some(ent);
            }
        }
    }

    None
}

/// Places `puff_type` at `dist` units along `p1 + dir`, backing off
/// [`BACKOFF`] (doubling up to [`MAX_BACKOFF_DOUBLINGS`] times if the
/// raw point lands outside its subsector's floor/ceiling envelope, the
/// dead-end corner case the original steps back from exponentially).
fn spawn_impact<R: GameRules>(
    level: &Level,
    table: &mut MobjTable,
    _rules: &mut R,
    puff_type: &'static MobjInfo,
    p1: Vec2,
    dir: Vec2,
    dist: f32,
    z: f32,
) {
    let mut backoff = BACKOFF;
    let mut point = p1 + dir * (dist - backoff).max(0.0);
    for _ in 0..MAX_BACKOFF_DOUBLINGS {
        let subsector = level.locate_subsector(point);
        let sector = &level.sectors[level.sector_of_subsector(subsector).index()];
        if z >= sector.floor.height && z <= sector.ceiling.height {
            break;
        }
        backoff *= 2.0;
        point = p1 + dir * (dist - backoff).max(0.0);
    }
    let subsector = level.locate_subsector(point);
    let puff = table.spawn(level, puff_type, point, 0.0, subsector);
    if let Ok(mut p) = table.world.get::<&mut Position>(puff) {
        p.1 = z;
    }
}
