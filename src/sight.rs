//! Line-of-sight test: reject-matrix short-circuit, then a
//! converging-slope LINE traversal identical in spirit to
//! `AimLineAttack`'s window narrowing but without mob inspection.
//!
//! Grounded in `P_CheckSight`/`P_CheckLineSight` (`p_map.cpp`); the
//! teacher has no sight code.

use hecs::Entity;

use crate::mobj::components::{Position, Size, Subsector};
use crate::mobj::table::MobjTable;
use crate::world::{Level, LineFlags};

/// Returns whether `a` has an unobstructed line of sight to `b`: both
/// must be linked, their sectors must not be mutually rejected, and the
/// straight line between their eye/body points must stay inside every
/// two-sided opening it crosses.
pub fn check_sight(level: &Level, table: &MobjTable, a: Entity, b: Entity) -> bool {
    let Ok(mut qa) = table.world.query_one::<(&Position, &Subsector)>(a) else {
        return false;
    };
    let Some((apos, asub)) = qa.get().map(|(p, s)| (*p, *s)) else {
        return false;
    };
    drop(qa);

    let Ok(mut qb) = table.world.query_one::<(&Position, &Subsector, &Size)>(b) else {
        return false;
    };
    let Some((bpos, bsub, bsize)) = qb.get().map(|(p, s, sz)| (*p, *s, *sz)) else {
        return false;
    };
    drop(qb);

    let a_sector = level.sector_of_subsector(asub.0);
    let b_sector = level.sector_of_subsector(bsub.0);
    if level.reject.rejects(a_sector, b_sector) {
        return false;
    }

    let z1 = apos.1 + 41.0;
    let z2 = bpos.1 + bsize.height / 2.0;
    let p1 = apos.0;
    let p2 = bpos.0;
    let total_dist = p1.distance(p2).max(1.0);

    let mut top_slope = f32::INFINITY;
    let mut bottom_slope = f32::NEG_INFINITY;
    let mut blocked = false;

    level.traverse_lines(p1, p2, |line_id, t| {
        let line = &level.lines[line_id.index()];
        if !line.flags.contains(LineFlags::TWO_SIDED) || line.back_sector.is_none() {
            blocked = true;
            return false;
        }
        let dist = (t * total_dist).max(1.0);
        let opening = level.line_opening(line);
        top_slope = top_slope.min((opening.top - z1) / dist);
        bottom_slope = bottom_slope.max((opening.bottom - z1) / dist);
        top_slope > bottom_slope
    });

    if blocked {
        return false;
    }

    let target_slope = (z2 - z1) / total_dist;
    target_slope <= top_slope && target_slope >= bottom_slope
}
