pub mod blockmap;
pub mod bsp;
pub mod geometry;
pub mod material;
pub mod reject;

pub use blockmap::{BlockCoord, Blockmap, BLOCK_SIZE};
pub use bsp::{box_on_line_side, segment_intersection_fraction};
pub use geometry::{
    Aabb, Level, Line, LineFlags, LineId, LineOpening, Node, NodeChild, NodeId, Plane, Polyobj,
    PolyobjId, Sector, SectorId, Side, SideId, SlopeType, Subsector, SubsectorId, Surface,
    ThingSpawn, Vertex, VertexId,
};
pub use material::{MaterialBank, MaterialError, MaterialId, MaterialKind};
pub use reject::RejectMatrix;
