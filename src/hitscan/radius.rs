//! `RadiusAttack`: splash damage scaled by Manhattan distance from the
//! blast origin, gated on line of sight.

use hecs::Entity;

use crate::config::Config;
use crate::defs::flags::MobjFlags;
use crate::hitscan::MAX_RADIUS;
use crate::interfaces::GameRules;
use crate::mobj::components::Position;
use crate::mobj::table::MobjTable;
use crate::sight::check_sight;
use crate::world::{Aabb, Level};
use glam::Vec2;

/// Damages every shootable mobj within `distance` map units of `bomb`
/// that also has line of sight to it, falling off linearly with
/// distance.
pub fn radius_attack<R: GameRules>(
    level: &Level,
    table: &mut MobjTable,
    rules: &mut R,
    config: &Config,
    bomb: Entity,
    source: Option<Entity>,
    damage: i32,
    distance: f32,
) {
    let Ok(bomb_pos) = table.world.get::<&Position>(bomb).map(|p| *p) else {
        return;
    };

    let span = distance + MAX_RADIUS;
    let bbox = Aabb::of_points([bomb_pos.0 - Vec2::splat(span), bomb_pos.0 + Vec2::splat(span)]);
    let mut candidates = Vec::new();
    table.grid.for_each_in_bbox(bbox, |stub| {
        candidates.push(stub.ent);
        true
    });

    for target in candidates {
        if target == bomb {
            continue;
        }
        let Ok((tpos, tflags)) = table
            .world
            .query_one_mut::<(&Position, &crate::mobj::components::ActorFlags)>(target)
            .map(|(p, f)| (*p, *f))
        else {
            continue;
        };
        if !tflags.0.contains(MobjFlags::SHOOTABLE) {
            continue;
        }

        let mut d = (tpos.0.x - bomb_pos.0.x).abs().max((tpos.0.y - bomb_pos.0.y).abs());
        if !config.net_no_max_z_radius_attack {
            d = d.max((tpos.1 - bomb_pos.1).abs());
        }
        if d >= distance {
            continue;
        }
        if !check_sight(level, table, bomb, target) {
            continue;
        }

        let amount = (damage as f32 * (distance - d) / distance + 1.0) as i32;
        rules.damage_mob(target, Some(bomb), source.or(Some(bomb)), amount, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::mobjinfo::{ROCKET, ZOMBIEMAN};
    use crate::interfaces::Activation;
    use crate::mobj::components::{ActorFlags, Angle, Animation, Class, Health, Size, Subsector, Velocity};
    use crate::mobj::grid::ThingSpatial;
    use crate::world::blockmap::Blockmap;
    use crate::world::reject::RejectMatrix;
    use crate::world::{NodeChild, SectorId, SubsectorId};

    struct RecordingRules {
        applied: Vec<(Entity, i32)>,
    }
    impl GameRules for RecordingRules {
        fn cross_special_line(&mut self, _l: crate::world::LineId, _m: Entity, _s: i32, _a: Activation) {}
        fn touch_special(&mut self, _p: Entity, _q: Entity) {}
        fn damage_mob(&mut self, target: Entity, _i: Option<Entity>, _s: Option<Entity>, amount: i32, _stomp: bool) -> i32 {
            self.applied.push((target, amount));
            amount
        }
        fn change_mob_state(&mut self, _mob: Entity, _state: crate::defs::State) {}
        fn remove_mob(&mut self, _mob: Entity) {}
        fn floor_terrain(&self, _mob: Entity) -> crate::defs::TerrainResponse {
            crate::defs::TerrainResponse::None
        }
    }

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
    fn damages_a_nearby_target_falling_off_with_distance() {
        let level = open_level();
        let mut table = MobjTable::new(Vec2::new(-512.0, -512.0));
        let bomb = spawn(&mut table, &ROCKET, Vec2::ZERO, 0.0);
        let target = spawn(&mut table, &ZOMBIEMAN, Vec2::new(64.0, 0.0), 0.0);
        let mut rules = RecordingRules { applied: Vec::new() };
        radius_attack(&level, &mut table, &mut rules, &Config::default(), bomb, None, 128, 128.0);
        assert_eq!(rules.applied.len(), 1);
        assert_eq!(rules.applied[0].0, target);
        assert!(rules.applied[0].1 < 128 && rules.applied[0].1 > 0);
    }

    #[test]
    fn ignores_targets_outside_the_blast_distance() {
        let level = open_level();
        let mut table = MobjTable::new(Vec2::new(-512.0, -512.0));
        let bomb = spawn(&mut table, &ROCKET, Vec2::ZERO, 0.0);
        let _target = spawn(&mut table, &ZOMBIEMAN, Vec2::new(500.0, 0.0), 0.0);
        let mut rules = RecordingRules { applied: Vec::new() };
        radius_attack(&level, &mut table, &mut rules, &Config::default(), bomb, None, 128, 128.0);
        assert!(rules.applied.is_empty());
    }
}
