//! Runtime mobj spatial hash — the movable-object counterpart to the
//! static line [`crate::world::Blockmap`].
//!
//! Grounded on the teacher's `sim/spacial.rs` `ThingGrid`: one `128×128`
//! map-unit cell per bucket, write-through from the movement system
//! (`remove` before a mobj moves, `insert` after). A `HashMap` keeps the
//! grid sparse — only cells something actually occupies allocate.

use glam::Vec2;
use hecs::Entity;
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::mobj::components::{ActorFlags, Class, Position, Size};
use crate::world::{Aabb, BLOCK_SIZE};

/// Pre-baked per-mobj data needed during collision queries without
/// borrowing the `hecs::World`.
#[derive(Clone, Copy)]
pub struct ThingSpatial {
    pub ent: Entity,
    pub pos: Position,
    pub class: Class,
    pub flags: ActorFlags,
    pub size: Size,
}

type Cell = SmallVec<[ThingSpatial; 8]>;

fn to_block(origin: Vec2, p: Vec2) -> (i32, i32) {
    (
        ((p.x - origin.x) / BLOCK_SIZE).floor() as i32,
        ((p.y - origin.y) / BLOCK_SIZE).floor() as i32,
    )
}

pub struct ThingGrid {
    origin: Vec2,
    cells: HashMap<(i32, i32), Cell>,
}

impl ThingGrid {
    pub fn new(origin: Vec2) -> ThingGrid {
        ThingGrid {
            origin,
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, stub: ThingSpatial) {
        let cell = to_block(self.origin, stub.pos.0);
        self.cells.entry(cell).or_default().push(stub);
    }

    pub fn remove(&mut self, stub: &ThingSpatial) {
        let cell = to_block(self.origin, stub.pos.0);
        if let Some(c) = self.cells.get_mut(&cell) {
            if let Some(i) = c.iter().position(|s| s.ent == stub.ent) {
                c.swap_remove(i);
            }
        }
    }

    /// Visit every stub whose origin cell overlaps `bbox`. Stops as soon
    /// as `f` returns `false`, matching `PIT_CheckThing`'s early-out.
    pub fn for_each_in_bbox<F>(&self, bbox: Aabb, mut f: F) -> bool
    where
        F: FnMut(&ThingSpatial) -> bool,
    {
        let (xl, yl) = to_block(self.origin, bbox.min);
        let (xh, yh) = to_block(self.origin, bbox.max);
        for bx in xl..=xh {
            for by in yl..=yh {
                if let Some(cell) = self.cells.get(&(bx, by)) {
                    for stub in cell {
                        if !f(stub) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}
