//! Plane-Change Propagator: after a sector's floor or ceiling moves,
//! revisit every mobj touching it to re-fit, snap, crush, or gib.
//!
//! Grounded in `PIT_ChangeSector`/`P_ChangeSector` (`p_map.cpp`); the
//! teacher has no equivalent at all.

use glam::Vec2;

use crate::config::Config;
use crate::defs::flags::MobjFlags;
use crate::defs::mobjinfo::BLOOD;
use crate::defs::State;
use crate::interfaces::GameRules;
use crate::mobj::components::{ActorFlags, Position, Size, Subsector, Velocity};
use crate::mobj::table::MobjTable;
use crate::movement::context::MoveContext;
use crate::movement::trymove::{check_position, MAX_RADIUS};
use crate::rng::Rng;
use crate::world::{Aabb, Level, SectorId};

/// Runs one `ChangeSector` pass and returns `noFit`: whether at least one
/// shootable mobj could not fit after the plane moved.
#[allow(clippy::too_many_arguments)]
pub fn change_sector<R: GameRules>(
    level: &Level,
    table: &mut MobjTable,
    rules: &mut R,
    config: &Config,
    rng: &mut Rng,
    sector_id: SectorId,
    crush_damage: i32,
    tic: u32,
) -> bool {
    let sector = &level.sectors[sector_id.index()];
    let mut no_fit = false;

    let touching: Vec<_> = {
        let mut stubs = Vec::new();
        table
            .grid
            .for_each_in_bbox(sector.bbox.expanded(MAX_RADIUS), |s| {
                stubs.push(*s);
                true
            });
        stubs
    };

    for stub in touching {
        if stub.flags.0.contains(MobjFlags::NOBLOCKMAP) {
            continue;
        }
        let Ok(sub) = table.world.get::<&Subsector>(stub.ent).map(|s| s.0) else {
            continue;
        };
        // `TouchingMobjsIterator`, not `SectorIterator`: a mob whose own
        // subsector belongs to a neighboring sector still touches this
        // one if its bounding square crosses the shared line, so this
        // is a bbox-overlap test against the sector rather than a
        // center-subsector membership check.
        let thing_bbox = Aabb {
            min: stub.pos.0 - Vec2::splat(stub.size.radius),
            max: stub.pos.0 + Vec2::splat(stub.size.radius),
        };
        if level.sector_of_subsector(sub) != sector_id && !sector.bbox.intersects(thing_bbox) {
            continue;
        }

        let was_on_floor = (stub.pos.1 - sector.floor.height).abs() < 1.0;

        let mut ctx = MoveContext::new(stub.ent, stub.pos.0, stub.size.radius, stub.pos.1, stub.pos.1);
        check_position(
            level,
            table,
            rules,
            &stub,
            stub.pos.0,
            config,
            false,
            stub.flags.0.contains(MobjFlags::CORPSE),
            &mut ctx,
        );

        if was_on_floor {
            if let Ok(mut pos) = table.world.get::<&mut Position>(stub.ent) {
                pos.1 = ctx.floor_z;
            }
        }

        if ctx.ceiling_z - ctx.floor_z >= stub.size.height {
            continue;
        }

        if stub.flags.0.contains(MobjFlags::CORPSE) {
            rules.change_mob_state(stub.ent, State::Gibs);
            if let Ok(mut flags) = table.world.get::<&mut ActorFlags>(stub.ent) {
                flags.0.remove(MobjFlags::SOLID);
            }
            if let Ok(mut size) = table.world.get::<&mut Size>(stub.ent) {
                size.radius = 0.0;
                size.height = 0.0;
            }
            continue;
        }

        if stub.flags.0.contains(MobjFlags::DROPPED) {
            rules.remove_mob(stub.ent);
            table.queue_removal(stub.ent);
            continue;
        }

        if stub.flags.0.contains(MobjFlags::SHOOTABLE) {
            no_fit = true;
            if crush_damage != 0 && tic % 4 == 0 {
                rules.damage_mob(stub.ent, None, None, crush_damage, false);
                if !stub.flags.0.contains(MobjFlags::NOBLOOD) {
                    spawn_blood_spray(level, table, rng, stub.pos.0, stub.pos.1, sub);
                }
            }
        }
    }

    no_fit
}

fn spawn_blood_spray(
    level: &Level,
    table: &mut MobjTable,
    rng: &mut Rng,
    pos: Vec2,
    z: f32,
    subsector: crate::world::SubsectorId,
) {
    let blood = table.spawn(level, &BLOOD, pos, 0.0, subsector);
    if let Ok(mut p) = table.world.get::<&mut Position>(blood) {
        p.1 = z;
    }
    if let Ok(mut v) = table.world.get::<&mut Velocity>(blood) {
        v.0.x = rng.sub_random() as f32 / 16.0;
        v.0.y = rng.sub_random() as f32 / 16.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::mobjinfo::ZOMBIEMAN;
    use crate::interfaces::Activation;
    use crate::mobj::components::{Angle, Animation, Class, Health, Size};
    use crate::mobj::grid::ThingSpatial;
    use crate::world::blockmap::Blockmap;
    use crate::world::reject::RejectMatrix;
    use crate::world::{Aabb, MaterialId, Node, NodeChild, NodeId, Plane, Sector, Subsector as SubsectorGeom};
    use hecs::Entity;

    struct NullRules;
    impl GameRules for NullRules {
        fn cross_special_line(&mut self, _l: crate::world::LineId, _m: Entity, _s: i32, _a: Activation) {}
        fn touch_special(&mut self, _p: Entity, _q: Entity) {}
        fn damage_mob(&mut self, _t: Entity, _i: Option<Entity>, _s: Option<Entity>, amount: i32, _stomp: bool) -> i32 {
            amount
        }
        fn change_mob_state(&mut self, _mob: Entity, _state: State) {}
        fn remove_mob(&mut self, _mob: Entity) {}
        fn floor_terrain(&self, _mob: Entity) -> crate::defs::TerrainResponse {
            crate::defs::TerrainResponse::None
        }
    }

    fn crusher_level(ceiling: f32) -> Level {
        Level {
            name: "TEST".into(),
            vertices: vec![],
            lines: vec![],
            sides: vec![],
            sectors: vec![Sector {
                floor: Plane { height: 0.0, material: MaterialId::NONE },
                ceiling: Plane { height: ceiling, material: MaterialId::NONE },
                light_level: 255,
                special: 0,
                tag: 0,
                bbox: Aabb::of_points([Vec2::new(-64.0, -64.0), Vec2::new(64.0, 64.0)]),
                lines: vec![],
                subsectors: vec![crate::world::SubsectorId(0)],
                sound_origin: Vec2::ZERO,
                reverb_bias: 0.0,
                valid_count: 0,
            }],
            subsectors: vec![SubsectorGeom {
                sector: SectorId(0),
                seg_count: 0,
                first_seg: 0,
                polyobj: None,
            }],
            nodes: vec![Node {
                x: 0.0,
                y: 0.0,
                dx: 1.0,
                dy: 0.0,
                bbox: [Aabb::EMPTY, Aabb::EMPTY],
                child: [
                    NodeChild::Subsector(crate::world::SubsectorId(0)),
                    NodeChild::Subsector(crate::world::SubsectorId(0)),
                ],
            }],
            polyobjs: vec![],
            things: vec![],
            root_node: Some(NodeId(0)),
            blockmap: Blockmap::build(Vec2::new(-128.0, -128.0), &[]),
            reject: RejectMatrix::all_visible(1),
        }
    }

    fn spawn_zombie(table: &mut MobjTable, pos: Vec2, z: f32) -> Entity {
        spawn_zombie_flagged(table, pos, z, ZOMBIEMAN.flags)
    }

    fn spawn_zombie_flagged(table: &mut MobjTable, pos: Vec2, z: f32, flags: MobjFlags) -> Entity {
        let ent = table.world.spawn((
            ActorFlags(flags),
            Position(pos, z),
            Velocity(Default::default()),
            Angle(0.0),
            Subsector(crate::world::SubsectorId(0)),
            Animation { state: ZOMBIEMAN.spawnstate, tics: 0 },
            Class(&ZOMBIEMAN),
            Size::of(&ZOMBIEMAN),
            Health(ZOMBIEMAN.spawnhealth),
        ));
        table.grid.insert(ThingSpatial {
            ent,
            pos: Position(pos, z),
            class: Class(&ZOMBIEMAN),
            flags: ActorFlags(flags),
            size: Size::of(&ZOMBIEMAN),
        });
        ent
    }

    #[test]
    fn zombie_does_not_fit_once_ceiling_descends_below_its_height() {
        let level = crusher_level(40.0); // zombieman height is 56
        let mut table = MobjTable::new(Vec2::new(-128.0, -128.0));
        let ent = spawn_zombie(&mut table, Vec2::ZERO, 0.0);
        let mut rules = NullRules;
        let mut rng = Rng::new(0);
        let no_fit = change_sector(
            &level,
            &mut table,
            &mut rules,
            &Config::default(),
            &mut rng,
            SectorId(0),
            10,
            4,
        );
        assert!(no_fit);
        assert!(table.world.contains(ent));
    }

    #[test]
    fn no_height_change_leaves_mobs_z_unchanged_and_fits() {
        let level = crusher_level(128.0);
        let mut table = MobjTable::new(Vec2::new(-128.0, -128.0));
        let _ent = spawn_zombie(&mut table, Vec2::ZERO, 0.0);
        let mut rules = NullRules;
        let mut rng = Rng::new(0);
        let no_fit = change_sector(
            &level,
            &mut table,
            &mut rules,
            &Config::default(),
            &mut rng,
            SectorId(0),
            0,
            1,
        );
        assert!(!no_fit);
    }

    #[test]
    fn crushed_corpse_is_flattened_to_zero_size() {
        let level = crusher_level(40.0);
        let mut table = MobjTable::new(Vec2::new(-128.0, -128.0));
        let ent = spawn_zombie_flagged(&mut table, Vec2::ZERO, 0.0, ZOMBIEMAN.flags | MobjFlags::CORPSE);
        let mut rules = NullRules;
        let mut rng = Rng::new(0);
        change_sector(&level, &mut table, &mut rules, &Config::default(), &mut rng, SectorId(0), 10, 4);
        let size = *table.world.get::<&Size>(ent).unwrap();
        assert_eq!(size.radius, 0.0);
        assert_eq!(size.height, 0.0);
        let flags = *table.world.get::<&ActorFlags>(ent).unwrap();
        assert!(!flags.0.contains(MobjFlags::SOLID));
    }

    /// Two sectors sharing a two-sided line at x=32: sector 0's ceiling is
    /// the one descending, sector 1's stays high. A zombie centered at
    /// x=40 (so its own subsector is sector 1) with radius 20 spans
    /// [20,60], straddling into sector 0.
    fn straddling_level(sector0_ceiling: f32) -> Level {
        let surface = crate::world::Surface { material: crate::world::MaterialId::NONE, x_off: 0.0, y_off: 0.0 };
        let verts = vec![
            crate::world::Vertex { pos: Vec2::new(32.0, -64.0), owner_lines: vec![crate::world::LineId(0)] },
            crate::world::Vertex { pos: Vec2::new(32.0, 64.0), owner_lines: vec![crate::world::LineId(0)] },
        ];
        let line = crate::world::Line {
            v1: crate::world::VertexId(0),
            v2: crate::world::VertexId(1),
            flags: crate::world::LineFlags::TWO_SIDED,
            special: 0,
            tag: 0,
            front_side: crate::world::SideId(0),
            back_side: Some(crate::world::SideId(1)),
            front_sector: SectorId(0),
            back_sector: Some(SectorId(1)),
            slope_type: crate::world::SlopeType::Vertical,
            bbox: Aabb::of_points([Vec2::new(32.0, -64.0), Vec2::new(32.0, 64.0)]),
            angle: 0,
            valid_count: 0,
        };
        let lines_bbox = vec![(crate::world::LineId(0), line.bbox)];
        Level {
            name: "TEST".into(),
            vertices: verts,
            lines: vec![line],
            sides: vec![
                crate::world::Side { sector: SectorId(0), upper: surface, lower: surface, middle: surface },
                crate::world::Side { sector: SectorId(1), upper: surface, lower: surface, middle: surface },
            ],
            sectors: vec![
                Sector {
                    floor: Plane { height: 0.0, material: MaterialId::NONE },
                    ceiling: Plane { height: sector0_ceiling, material: MaterialId::NONE },
                    light_level: 255,
                    special: 0,
                    tag: 0,
                    bbox: Aabb::of_points([Vec2::new(-64.0, -64.0), Vec2::new(32.0, 64.0)]),
                    lines: vec![crate::world::LineId(0)],
                    subsectors: vec![crate::world::SubsectorId(0)],
                    sound_origin: Vec2::ZERO,
                    reverb_bias: 0.0,
                    valid_count: 0,
                },
                Sector {
                    floor: Plane { height: 0.0, material: MaterialId::NONE },
                    ceiling: Plane { height: 256.0, material: MaterialId::NONE },
                    light_level: 255,
                    special: 0,
                    tag: 0,
                    bbox: Aabb::of_points([Vec2::new(32.0, -64.0), Vec2::new(128.0, 64.0)]),
                    lines: vec![crate::world::LineId(0)],
                    subsectors: vec![crate::world::SubsectorId(1)],
                    sound_origin: Vec2::ZERO,
                    reverb_bias: 0.0,
                    valid_count: 0,
                },
            ],
            subsectors: vec![
                SubsectorGeom { sector: SectorId(0), seg_count: 0, first_seg: 0, polyobj: None },
                SubsectorGeom { sector: SectorId(1), seg_count: 0, first_seg: 0, polyobj: None },
            ],
            nodes: vec![Node {
                x: 32.0,
                y: 0.0,
                dx: 0.0,
                dy: 1.0,
                bbox: [Aabb::EMPTY, Aabb::EMPTY],
                child: [
                    NodeChild::Subsector(crate::world::SubsectorId(1)),
                    NodeChild::Subsector(crate::world::SubsectorId(0)),
                ],
            }],
            polyobjs: vec![],
            things: vec![],
            root_node: Some(NodeId(0)),
            blockmap: Blockmap::build(Vec2::new(-128.0, -128.0), &lines_bbox),
            reject: RejectMatrix::all_visible(2),
        }
    }

    #[test]
    fn mob_straddling_into_a_crushing_sector_from_its_neighbor_is_not_skipped() {
        let level = straddling_level(40.0); // zombieman height is 56
        let mut table = MobjTable::new(Vec2::new(-128.0, -128.0));
        let ent = table.world.spawn((
            ActorFlags(ZOMBIEMAN.flags),
            Position(Vec2::new(40.0, 0.0), 0.0),
            Velocity(Default::default()),
            Angle(0.0),
            Subsector(crate::world::SubsectorId(1)),
            Animation { state: ZOMBIEMAN.spawnstate, tics: 0 },
            Class(&ZOMBIEMAN),
            Size::of(&ZOMBIEMAN),
            Health(ZOMBIEMAN.spawnhealth),
        ));
        table.grid.insert(ThingSpatial {
            ent,
            pos: Position(Vec2::new(40.0, 0.0), 0.0),
            class: Class(&ZOMBIEMAN),
            flags: ActorFlags(ZOMBIEMAN.flags),
            size: Size::of(&ZOMBIEMAN),
        });
        let mut rules = NullRules;
        let mut rng = Rng::new(0);
        // Sector 0 is the one whose ceiling dropped; the mob's own
        // subsector is sector 1, so only the bbox-overlap test picks it up.
        let no_fit = change_sector(&level, &mut table, &mut rules, &Config::default(), &mut rng, SectorId(0), 10, 4);
        assert!(no_fit);
        assert!(table.world.contains(ent));
    }
}
