//! The movement engine: `TryMove`'s check/admit/commit pipeline, the
//! `ChangeSector` plane-change propagator, and the wall slide/bounce
//! fallbacks a blocked move falls through to.

pub mod bounce;
pub mod changesector;
pub mod context;
pub mod slide;
pub mod trymove;

pub use bounce::bounce_wall;
pub use changesector::change_sector;
pub use context::MoveContext;
pub use slide::slide_move;
pub use trymove::{check_position, try_move, MAX_RADIUS, STEP_HEIGHT};
