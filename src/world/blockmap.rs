//! Spatial hash grid over lines and mobjs, used to avoid scanning every
//! line/mobj in the map on every movement check.
//!
//! Ground truth: the original `BLOCKMAP` lump partitions the map into
//! 128-unit-square cells and lists, per cell, the lines crossing it. The
//! mobj side of the grid (`ThingGrid` in the teacher's `sim/spacial.rs`)
//! is the runtime analogue for movable objects, rebuilt as mobjs move
//! instead of loaded from a lump.

use glam::Vec2;
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::world::geometry::{Aabb, LineId};

/// Size of one grid cell in map units (matches `MAPBLOCKSIZE` in the
/// original fixed-point code, `1 << 7`).
pub const BLOCK_SIZE: f32 = 128.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockCoord {
    pub bx: i32,
    pub by: i32,
}

/// Static line blockmap, built once at load time.
#[derive(Debug)]
pub struct Blockmap {
    pub origin: Vec2,
    pub width: i32,
    pub height: i32,
    cells: Vec<SmallVec<[LineId; 8]>>,
}

impl Blockmap {
    pub fn to_block(&self, p: Vec2) -> BlockCoord {
        BlockCoord {
            bx: ((p.x - self.origin.x) / BLOCK_SIZE).floor() as i32,
            by: ((p.y - self.origin.y) / BLOCK_SIZE).floor() as i32,
        }
    }

    fn index(&self, c: BlockCoord) -> Option<usize> {
        if c.bx < 0 || c.by < 0 || c.bx >= self.width || c.by >= self.height {
            return None;
        }
        Some((c.by * self.width + c.bx) as usize)
    }

    pub fn lines_in_cell(&self, c: BlockCoord) -> &[LineId] {
        self.index(c).map(|i| &self.cells[i][..]).unwrap_or(&[])
    }

    /// Visit every *unique* line whose blockmap cells overlap `bbox`,
    /// matching the original `P_BlockLinesIterator` early-out contract:
    /// stop as soon as `func` returns `false`.
    pub fn lines_in_bbox<F: FnMut(LineId) -> bool>(&self, bbox: Aabb, mut func: F) -> bool {
        let lo = self.to_block(bbox.min);
        let hi = self.to_block(bbox.max);
        let mut visited: HashMap<u32, ()> = HashMap::new();
        for by in lo.by.max(0)..=hi.by.min(self.height - 1) {
            for bx in lo.bx.max(0)..=hi.bx.min(self.width - 1) {
                for &id in self.lines_in_cell(BlockCoord { bx, by }) {
                    if visited.insert(id.0, ()).is_some() {
                        continue;
                    }
                    if !func(id) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Build from the finished line list: for every line, rasterize its
    /// bbox into cells and stash the id into each cell it overlaps. The
    /// real `BLOCKMAP` lump ships pre-rasterized but this crate builds
    /// synthetic levels directly, so constructing it from geometry is the
    /// natural entry point (the WAD loader can still prefer the shipped
    /// lump when one is present, same idea, different source).
    pub fn build(origin: Vec2, lines: &[(LineId, Aabb)]) -> Blockmap {
        let overall = lines
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, bbox)| acc.union(*bbox));
        let width = (((overall.max.x - origin.x) / BLOCK_SIZE).ceil() as i32 + 1).max(1);
        let height = (((overall.max.y - origin.y) / BLOCK_SIZE).ceil() as i32 + 1).max(1);
        let mut cells = vec![SmallVec::new(); (width * height) as usize];
        let bm_shape = Blockmap {
            origin,
            width,
            height,
            cells: vec![],
        };
        for &(id, bbox) in lines {
            let lo = bm_shape.to_block(bbox.min);
            let hi = bm_shape.to_block(bbox.max);
            for by in lo.by.max(0)..=hi.by.min(height - 1) {
                for bx in lo.bx.max(0)..=hi.bx.min(width - 1) {
                    let idx = (by * width + bx) as usize;
                    cells[idx].push(id);
                }
            }
        }
        Blockmap {
            origin,
            width,
            height,
            cells,
        }
    }
}
