//! Static map data: the immutable geometry a level is built from.
//!
//! Ids are stable `u32`/`u16` newtypes rather than Rust references, so the
//! movement/hitscan code can hold a `LineId` inside a `Mobj` or a per-tic
//! scratch list without fighting the borrow checker over back-references
//! (line → sector → line, mobj → sector → mobj, …).

use bitflags::bitflags;
use glam::Vec2;

use crate::world::blockmap::Blockmap;
use crate::world::material::MaterialId;
use crate::world::reject::RejectMatrix;

macro_rules! index_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

index_id!(VertexId);
index_id!(LineId);
index_id!(SideId);
index_id!(SectorId);
index_id!(SubsectorId);
index_id!(NodeId);
index_id!(PolyobjId);

/// A map vertex. `owner_lines` lists every line touching it — the "owner
/// ring" used by polyobject rotation and by vertex-shared-wall queries,
/// neither of which the raw WAD format records directly.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub pos: Vec2,
    pub owner_lines: Vec<LineId>,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0010;
        const LOWER_UNPEGGED  = 0x0020;
        const SECRET          = 0x0040;
        const BLOCK_SOUND     = 0x0080;
        const NOT_ON_MAP      = 0x0200;
        const ALREADY_ON_MAP  = 0x1000;
        /// Redesigned behaviour: blocks everything, not just monsters
        /// (players included) — see the REDESIGN FLAGS section.
        const BLOCK_EVERYTHING = 0x2000;
    }
}

/// Coarse classification used to fast-path `box_on_line_side` the way the
/// original engine's `P_BoxOnLineSide`/`slopetype_t` machinery does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlopeType {
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

/// A map edge: the fundamental collision primitive. Two-sided lines carry
/// a back sidedef/sector and participate in `LineOpening` queries; one-
/// sided lines are always fully solid.
#[derive(Clone, Debug)]
pub struct Line {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LineFlags,
    pub special: u16,
    pub tag: u16,
    pub front_side: SideId,
    pub back_side: Option<SideId>,
    pub front_sector: SectorId,
    pub back_sector: Option<SectorId>,
    pub slope_type: SlopeType,
    /// Precomputed AABB over `v1`/`v2`, used to reject blockmap/BSP
    /// candidates before the more expensive cross-product test.
    pub bbox: Aabb,
    /// Binary angle (0..=65535 maps to 0..360°), matching the original's
    /// `R_PointToAngle`-derived line angle used by several specials.
    pub angle: u32,
    /// Traversal de-duplication counter — bumped to the current global
    /// tick whenever a BSP/blockmap walk visits this line, so repeated
    /// visits in the same query are skipped without a hash set.
    pub valid_count: u32,
}

impl Line {
    pub fn delta(&self, vertices: &[Vertex]) -> Vec2 {
        vertices[self.v2.index()].pos - vertices[self.v1.index()].pos
    }
}

/// One surface texture slot on a sidedef (upper/lower/middle).
#[derive(Clone, Copy, Debug)]
pub struct Surface {
    pub material: MaterialId,
    pub x_off: f32,
    pub y_off: f32,
}

/// Texture information plus sector link for one side of a linedef.
#[derive(Clone, Debug)]
pub struct Side {
    pub sector: SectorId,
    pub upper: Surface,
    pub lower: Surface,
    pub middle: Surface,
}

/// A floor or ceiling plane: height plus the material it's made of. Used
/// both for the sector's own planes and the moving planes a special
/// sector effect drives.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub height: f32,
    pub material: MaterialId,
}

/// A convex sector region. Holds everything `ChangeSector`/`TryMove` need:
/// the two planes, a AABB/bounding-line set for plane-change dirty-rect
/// queries, and the head of the intrusive mobj-in-sector linked list.
#[derive(Clone, Debug)]
pub struct Sector {
    pub floor: Plane,
    pub ceiling: Plane,
    pub light_level: i16,
    pub special: i16,
    pub tag: i16,
    pub bbox: Aabb,
    pub lines: Vec<LineId>,
    pub subsectors: Vec<SubsectorId>,
    /// Anchor point sound propagation rolls outward from (sector centroid).
    pub sound_origin: Vec2,
    pub reverb_bias: f32,
    /// Traversal de-duplication counter, same role as `Line::valid_count`.
    pub valid_count: u32,
}

/// A convex BSP leaf: the polygon a mobj is actually "in".
#[derive(Clone, Debug)]
pub struct Subsector {
    pub sector: SectorId,
    pub seg_count: u16,
    pub first_seg: u16,
    /// Set when a polyobject's origin subsector coincides with this leaf.
    pub polyobj: Option<PolyobjId>,
}

/// One BSP splitting node.
#[derive(Clone, Debug)]
pub struct Node {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub bbox: [Aabb; 2],
    /// Bit 15 of the raw child value marks a subsector leaf; see
    /// [`NodeChild`].
    pub child: [NodeChild; 2],
}

#[derive(Clone, Copy, Debug)]
pub enum NodeChild {
    Node(NodeId),
    Subsector(SubsectorId),
}

/// A movable compound object built from a contiguous vertex/line group —
/// sliding doors on rails, the rotating centre of a circular lift. Not
/// modelled at all in the scanned retrieval pack; added because
/// `ChangeSector`'s dirty-rect propagation needs a sector-owner concept
/// that also covers polyobject-carried lines.
#[derive(Clone, Debug)]
pub struct Polyobj {
    pub lines: Vec<LineId>,
    pub origin: Vec2,
    pub angle: f32,
    pub seq_type: i32,
}

/// Axis-aligned bounding box in map units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    pub fn of_points(points: impl IntoIterator<Item = Vec2>) -> Aabb {
        let mut b = Aabb::EMPTY;
        for p in points {
            b.min = b.min.min(p);
            b.max = b.max.max(p);
        }
        b
    }

    pub fn union(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expanded(self, radius: f32) -> Aabb {
        Aabb {
            min: self.min - Vec2::splat(radius),
            max: self.max + Vec2::splat(radius),
        }
    }

    pub fn intersects(self, other: Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains_point(self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Per-thing spawn record carried over from the raw THINGS lump, prior to
/// actual mobj spawning (which needs the mobj table/ECS world to exist).
#[derive(Clone, Debug)]
pub struct ThingSpawn {
    pub pos: Vec2,
    pub angle: f32,
    pub doomednum: u16,
    pub min_skill: u8,
    pub is_deaf: bool,
    pub multiplayer_only: bool,
}

/// Opening between floor/ceiling across a two-sided line at a given
/// point, plus the lowest-floor figure used for step-down/dropoff checks.
/// Computed fresh per query; never stored.
#[derive(Clone, Copy, Debug)]
pub struct LineOpening {
    pub top: f32,
    pub bottom: f32,
    pub range: f32,
    pub lowest_floor: f32,
}

/// Runtime snapshot of one map (immutable after load).
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub lines: Vec<Line>,
    pub sides: Vec<Side>,
    pub sectors: Vec<Sector>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub polyobjs: Vec<Polyobj>,
    pub things: Vec<ThingSpawn>,
    pub root_node: Option<NodeId>,
    pub blockmap: Blockmap,
    pub reject: RejectMatrix,
}

impl Level {
    pub fn line_opening(&self, line: &Line) -> LineOpening {
        let Some(back) = line.back_sector else {
            return LineOpening {
                top: 0.0,
                bottom: 0.0,
                range: 0.0,
                lowest_floor: 0.0,
            };
        };
        let front = &self.sectors[line.front_sector.index()];
        let back = &self.sectors[back.index()];
        let top = front.ceiling.height.min(back.ceiling.height);
        let bottom = front.floor.height.max(back.floor.height);
        LineOpening {
            top,
            bottom,
            range: top - bottom,
            lowest_floor: front.floor.height.min(back.floor.height),
        }
    }

    pub fn sector_of_subsector(&self, id: SubsectorId) -> SectorId {
        self.subsectors[id.index()].sector
    }
}
