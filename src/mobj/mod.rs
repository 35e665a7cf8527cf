pub mod components;
pub mod grid;
pub mod table;

pub use components::{
    ActorFlags, Angle, Animation, Class, Health, InputCmd, Position, Size, Subsector, Velocity,
};
pub use grid::{ThingGrid, ThingSpatial};
pub use table::MobjTable;
