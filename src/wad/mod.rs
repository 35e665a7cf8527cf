pub mod level;
pub mod loader;
pub mod wad;

pub use level::{
    LevelError, RawLevel, RawLinedef, RawNode, RawSector, RawSeg, RawSidedef, RawSubsector,
    RawThing, RawVertex,
};
pub use loader::{load_level, LoadError};
pub use wad::{LumpInfo, Wad, WadError, WadKind};
