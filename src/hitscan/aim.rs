//! Autoaim: `AimLineAttack`'s converging vertical-slope window.

use glam::Vec2;
use hecs::Entity;

use crate::config::Config;
use crate::defs::flags::MobjFlags;
use crate::hitscan::{collect_intercepts, eye_height, Intercept};
use crate::mobj::components::{ActorFlags, Class, Position, Size};
use crate::mobj::table::MobjTable;
use crate::world::{Level, LineFlags};

/// Initial clip window, matching the original's `±100/160` slope bound.
const INITIAL_SLOPE: f32 = 100.0 / 160.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct AimResult {
    pub slope: f32,
    pub target: Option<Entity>,
}

/// Traces from `shooter`'s eye, along `angle`, for `range` units,
/// narrowing a vertical clip window at every two-sided line crossing
/// and accepting the first shootable mobj whose silhouette sits fully
/// inside the surviving window.
pub fn aim_line_attack(level: &Level, table: &MobjTable, config: &Config, shooter: Entity, angle: f32, range: f32) -> AimResult {
    let Ok(mut query) = table.world.query_one::<(&Position, &Class)>(shooter) else {
        return AimResult::default();
    };
    let Some((pos, class)) = query.get().map(|(p, c)| (*p, *c)) else {
        return AimResult::default();
    };
    drop(query);

    let is_player = class.0.id == "PLAYER";
    let shooter_z = pos.1 + eye_height(class.0, is_player, config);
    let dir = Vec2::new(angle.cos(), angle.sin());
    let p1 = pos.0;
    let p2 = pos.0 + dir * range;

    let mut top_slope = INITIAL_SLOPE;
    let mut bottom_slope = -INITIAL_SLOPE;

    for intercept in collect_intercepts(level, table, p1, p2, shooter) {
        match intercept {
            Intercept::Line(line_id, t) => {
                let line = &level.lines[line_id.index()];
                if !line.flags.contains(LineFlags::TWO_SIDED) || line.back_sector.is_none() {
                    break;
                }
                let dist = (t * range).max(1.0);
                let opening = level.line_opening(line);
                top_slope = top_slope.min((opening.top - shooter_z) / dist);
                bottom_slope = bottom_slope.max((opening.bottom - shooter_z) / dist);
                if top_slope <= bottom_slope {
                    break;
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
                let thing_top = (tpos.1 + tsize.height - shooter_z) / dist;
                let thing_bottom = (tpos.1 - shooter_z) / dist;
                if thing_top <= top_slope && thing_bottom >= bottom_slope {
                    return AimResult {
                        slope: (thing_top + thing_bottom) / 2.0,
                        target: Some(ent),
                    };
                }
            }
        }
    }

    AimResult { slope: 0.0, target: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::mobjinfo::{PLAYER, ZOMBIEMAN};
    use crate::mobj::components::{Angle, Animation, Health, Subsector, Velocity};
    use crate::mobj::grid::ThingSpatial;
    use crate::world::blockmap::Blockmap;
    use crate::world::reject::RejectMatrix;
    use crate::world::{Aabb, NodeChild, SectorId, SubsectorId};

    fn open_level() -> Level {
        Level {
            name: "TEST".into(),
            vertices: vec![],
            lines: vec![],
            sides: vec![],
            sectors: vec![crate::world::Sector {
                floor: crate::world::Plane { height: 0.0, material: crate::world::MaterialId::NONE },
                ceiling: crate::world::Plane { height: 512.0, material: crate::world::MaterialId::NONE },
                light_level: 255,
                special: 0,
                tag: 0,
                bbox: Aabb::of_points([Vec2::new(-512.0, -512.0), Vec2::new(512.0, 512.0)]),
                lines: vec![],
                subsectors: vec![SubsectorId(0)],
                sound_origin: Vec2::ZERO,
                reverb_bias: 0.0,
                valid_count: 0,
            }],
            subsectors: vec![crate::world::Subsector { sector: SectorId(0), seg_count: 0, first_seg: 0, polyobj: None }],
            nodes: vec![crate::world::Node {
                x: 0.0,
                y: 0.0,
                dx: 1.0,
                dy: 0.0,
                bbox: [Aabb::EMPTY, Aabb::EMPTY],
                child: [NodeChild::Subsector(SubsectorId(0)), NodeChild::Subsector(SubsectorId(0))],
            }],
            polyobjs: vec![],
            things: vec![],
            root_node: Some(crate::world::NodeId(0)),
            blockmap: Blockmap::build(Vec2::new(-512.0, -512.0), &[]),
            reject: RejectMatrix::all_visible(1),
        }
    }

    fn spawn(table: &mut MobjTable, info: &'static crate::defs::MobjInfo, pos: Vec2, z: f32) -> Entity {
        let ent = table.world.spawn((
            ActorFlags(info.flags),
            Position(pos, z),
            Velocity(Default::default()),
            Angle(0.0),
            Subsector(SubsectorId(0)),
            Animation { state: info.spawnstate, tics: 0 },
            Class(info),
            Size::of(info),
            Health(info.spawnhealth),
        ));
        table.grid.insert(ThingSpatial { ent, pos: Position(pos, z), class: Class(info), flags: ActorFlags(info.flags), size: Size::of(info) });
        ent
    }

    #[test]
    fn aims_at_a_target_directly_ahead_on_the_same_plane() {
        let level = open_level();
        let mut table = MobjTable::new(Vec2::new(-512.0, -512.0));
        let shooter = spawn(&mut table, &PLAYER, Vec2::ZERO, 0.0);
        let target = spawn(&mut table, &ZOMBIEMAN, Vec2::new(200.0, 0.0), 0.0);
        let result = aim_line_attack(&level, &table, &Config::default(), shooter, 0.0, 512.0);
        assert_eq!(result.target, Some(target));
    }

    #[test]
    fn finds_nothing_along_an_empty_line() {
        let level = open_level();
        let mut table = MobjTable::new(Vec2::new(-512.0, -512.0));
        let shooter = spawn(&mut table, &PLAYER, Vec2::ZERO, 0.0);
        let result = aim_line_attack(&level, &table, &Config::default(), shooter, 0.0, 512.0);
        assert_eq!(result.target, None);
    }
}
