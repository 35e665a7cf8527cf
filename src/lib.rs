//! World physics and BSP traversal core for a Doom-derived game engine:
//! BSP/blockmap spatial queries, mobj movement and collision (`TryMove`,
//! `ChangeSector`), wall sliding/bouncing, and the hitscan/aim/sight
//! engine, decoupled from rendering and game-rules scripting behind the
//! traits in [`interfaces`].

pub mod config;
pub mod defs;
pub mod hitscan;
pub mod interfaces;
pub mod mobj;
pub mod movement;
pub mod rng;
pub mod sight;
pub mod wad;
pub mod world;

pub use config::Config;
pub use interfaces::{Activation, GameRules, ScriptHost, Terrain, ThinkerScheduler};
pub use mobj::MobjTable;
pub use rng::Rng;
