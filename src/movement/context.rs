//! The explicit replacement for the original's `tm*` file-scope globals
//! (`tmBox`, `tmFloorZ`, `tmCeilingZ`, `tmFloorLine`, `tmCeilingLine`,
//! `tmBlockingLine`, `spechit`, `tmThing`, `tmFloorMaterial`): one
//! workspace value threaded by `&mut` reference through `try_move`,
//! `check_position`, `check_thing`, and `check_line`, so a crossing
//! callback that re-enters movement mid-traversal gets its own workspace
//! instead of clobbering the caller's.

use glam::Vec2;
use hecs::Entity;
use smallvec::SmallVec;

use crate::world::{Aabb, LineId, MaterialId};

#[derive(Debug, Clone)]
pub struct MoveContext {
    pub thing: Entity,
    pub bbox: Aabb,
    pub floor_z: f32,
    pub ceiling_z: f32,
    pub dropoff_z: f32,
    pub floor_material: MaterialId,
    pub blocking_line: Option<LineId>,
    pub ceiling_line: Option<LineId>,
    pub floor_line: Option<LineId>,
    /// Lines with a special crossed this move, LIFO-activated on commit
    /// (spec: "crossing activations execute in LIFO order").
    pub spechit: SmallVec<[LineId; 8]>,
    /// Set when the mover is stepping up onto a solid mobj's back.
    pub on_mobj: Option<Entity>,
    /// Set when the admitted move stepped down more than would be
    /// allowed without `allow_drop_off`.
    pub fell_down: bool,
}

impl MoveContext {
    pub fn new(thing: Entity, dest: Vec2, radius: f32, floor_z: f32, ceiling_z: f32) -> MoveContext {
        MoveContext {
            thing,
            bbox: Aabb {
                min: dest - Vec2::splat(radius),
                max: dest + Vec2::splat(radius),
            },
            floor_z,
            ceiling_z,
            dropoff_z: floor_z,
            floor_material: MaterialId::NONE,
            blocking_line: None,
            ceiling_line: None,
            floor_line: None,
            spechit: SmallVec::new(),
            on_mobj: None,
            fell_down: false,
        }
    }
}
