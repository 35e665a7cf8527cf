//! `P_UseLines`: a short fixed-range trace along the player's facing
//! angle that activates the first special line it meets from the front.

use glam::Vec2;
use hecs::Entity;

use crate::config::Config;
use crate::interfaces::{Activation, GameRules};
use crate::mobj::components::Position;
use crate::mobj::table::MobjTable;
use crate::world::{Level, LineFlags};

/// Range of a use-line trace, matching the original's fixed `USERANGE`.
const USE_RANGE: f32 = 64.0;

/// Traces `USE_RANGE` units along `angle` from `pos` and activates the
/// first special line crossed, provided it's crossed from its front
/// side. Stops at the first solid (non-two-sided) line even if it has
/// no special, since a wall blocks the trace from reaching anything
/// past it. Returns whether a special was activated.
pub fn use_lines<R: GameRules>(level: &Level, table: &MobjTable, rules: &mut R, _config: &Config, player: Entity, angle: f32) -> bool {
    let Ok(pos) = table.world.get::<&Position>(player).map(|p| p.0) else {
        return false;
    };

    let dir = Vec2::new(angle.cos(), angle.sin());
    let p1 = pos;
    let p2 = pos + dir * USE_RANGE;

    let mut activated = false;
    level.traverse_lines(p1, p2, |line_id, _t| {
        let line = &level.lines[line_id.index()];
        let v1 = level.vertices[line.v1.index()].pos;
        let v2 = level.vertices[line.v2.index()].pos;
        let d = v2 - v1;
        let side = if (p1.x - v1.x) * d.y - (p1.y - v1.y) * d.x <= 0.0 { 0 } else { 1 };

        let two_sided = line.flags.contains(LineFlags::TWO_SIDED) && line.back_sector.is_some();
        if line.special != 0 && side == 0 {
            rules.cross_special_line(line_id, player, side as i32, Activation::Use);
            activated = true;
            return false;
        }
        two_sided
    });

    activated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::mobjinfo::PLAYER;
    use crate::mobj::components::{ActorFlags, Angle, Animation, Class, Health, Size, Subsector, Velocity};
    use crate::mobj::grid::ThingSpatial;
    use crate::world::blockmap::Blockmap;
    use crate::world::reject::RejectMatrix;
    use crate::world::{Aabb, Line, NodeChild, SectorId, Side, SideId, SlopeType, SubsectorId, Surface, Vertex, VertexId};

    struct RecordingRules {
        activated: Vec<Entity>,
    }
    impl GameRules for RecordingRules {
        fn cross_special_line(&mut self, _l: crate::world::LineId, mob: Entity, _s: i32, activation: Activation) {
            assert_eq!(activation, Activation::Use);
            self.activated.push(mob);
        }
        fn touch_special(&mut self, _p: Entity, _q: Entity) {}
        fn damage_mob(&mut self, _t: Entity, _i: Option<Entity>, _s: Option<Entity>, amount: i32, _stomp: bool) -> i32 {
            amount
        }
        fn change_mob_state(&mut self, _mob: Entity, _state: crate::defs::State) {}
        fn remove_mob(&mut self, _mob: Entity) {}
        fn floor_terrain(&self, _mob: Entity) -> crate::defs::TerrainResponse {
            crate::defs::TerrainResponse::None
        }
    }

    fn level_with_door(special: u16) -> Level {
        let surface = Surface { material: crate::world::MaterialId::NONE, x_off: 0.0, y_off: 0.0 };
        Level {
            name: "TEST".into(),
            vertices: vec![
                Vertex { pos: Vec2::new(32.0, -64.0), owner_lines: vec![] },
                Vertex { pos: Vec2::new(32.0, 64.0), owner_lines: vec![] },
            ],
            lines: vec![Line {
                v1: VertexId(0),
                v2: VertexId(1),
                flags: LineFlags::IMPASSABLE,
                special,
                tag: 1,
                front_side: SideId(0),
                back_side: None,
                front_sector: SectorId(0),
                back_sector: None,
                slope_type: SlopeType::Vertical,
                bbox: Aabb::of_points([Vec2::new(32.0, -64.0), Vec2::new(32.0, 64.0)]),
                angle: 0,
                valid_count: 0,
            }],
            sides: vec![Side { sector: SectorId(0), upper: surface, lower: surface, middle: surface }],
            sectors: vec![crate::world::Sector {
                floor: crate::world::Plane { height: 0.0, material: crate::world::MaterialId::NONE },
                ceiling: crate::world::Plane { height: 256.0, material: crate::world::MaterialId::NONE },
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

    fn spawn_player(table: &mut MobjTable) -> Entity {
        let ent = table.world.spawn((
            ActorFlags(PLAYER.flags),
            Position(Vec2::ZERO, 0.0),
            Velocity(Default::default()),
            Angle(0.0),
            Subsector(SubsectorId(0)),
            Animation { state: PLAYER.spawnstate, tics: 0 },
            Class(&PLAYER),
            Size::of(&PLAYER),
            Health(PLAYER.spawnhealth),
        ));
        table.grid.insert(ThingSpatial { ent, pos: Position(Vec2::ZERO, 0.0), class: Class(&PLAYER), flags: ActorFlags(PLAYER.flags), size: Size::of(&PLAYER) });
        ent
    }

    #[test]
    fn activates_a_special_line_within_range() {
        let level = level_with_door(1);
        let mut table = MobjTable::new(Vec2::new(-512.0, -512.0));
        let player = spawn_player(&mut table);
        let mut rules = RecordingRules { activated: Vec::new() };
        let used = use_lines(&level, &table, &mut rules, &Config::default(), player, 0.0);
        assert!(used);
        assert_eq!(rules.activated, vec![player]);
    }

    #[test]
    fn ignores_a_line_with_no_special() {
        let level = level_with_door(0);
        let mut table = MobjTable::new(Vec2::new(-512.0, -512.0));
        let player = spawn_player(&mut table);
        let mut rules = RecordingRules { activated: Vec::new() };
        let used = use_lines(&level, &table, &mut rules, &Config::default(), player, 0.0);
        assert!(!used);
        assert!(rules.activated.is_empty());
    }
}
