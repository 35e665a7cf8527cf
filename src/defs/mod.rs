pub mod flags;
pub mod mobjinfo;
pub mod state;

pub use crate::defs::{
    flags::{DAMAGE_USE_DEFINITION, MF_TRANSSHIFT, MobjFlags, MobjFlags2},
    mobjinfo::{MOBJINFO, MobjInfo, TerrainResponse},
    state::State,
};
