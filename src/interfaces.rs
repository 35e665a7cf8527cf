//! Trait boundaries to the collaborators this crate never implements
//! itself: game-rules scripting, the ACS-style script host, and whatever
//! owns the thinker list. Kept object-safe (`Box<dyn GameRules>` must
//! work for a caller that wants dynamic dispatch) but movement/hitscan
//! code takes `impl GameRules` by generic parameter, matching the
//! teacher's preference for monomorphized collaborators (`Engine<R:
//! Renderer>`) over trait objects on the hot path.

use hecs::Entity;

use crate::world::LineId;

/// `activation` argument to [`GameRules::cross_special_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Cross,
    Impact,
    Use,
    Push,
    McCross,
    PCross,
}

/// Terrain response reported back for footstep/splash effects; mirrors
/// [`crate::defs::TerrainResponse`] but named at the interface boundary
/// since a future terrain table could live entirely on the game-rules
/// side.
pub type Terrain = crate::defs::TerrainResponse;

/// Everything the movement/hitscan/change-sector code needs from the
/// game-rules plugin. None of these may block or suspend; a deferred
/// action that cannot run immediately should queue itself and return.
pub trait GameRules {
    fn cross_special_line(&mut self, line: LineId, mob: Entity, side: i32, activation: Activation);
    fn touch_special(&mut self, pickup: Entity, picker: Entity);
    /// Returns the actual damage applied, which may be less than
    /// `amount` (armor, invulnerability, …).
    fn damage_mob(
        &mut self,
        target: Entity,
        inflictor: Option<Entity>,
        source: Option<Entity>,
        amount: i32,
        stomp: bool,
    ) -> i32;
    fn change_mob_state(&mut self, mob: Entity, state: crate::defs::State);
    fn remove_mob(&mut self, mob: Entity);
    fn floor_terrain(&self, mob: Entity) -> Terrain;
}

/// The ACS-equivalent script interpreter boundary.
pub trait ScriptHost {
    fn has_script(&self, number: i32) -> bool;
    fn start_script(&mut self, number: i32, args: [i32; 4], activator: Option<Entity>, line: Option<LineId>, side: i32);
    fn use_puzzle_item(&mut self, player: Entity, item_type: i32) -> bool;
}

/// Visits every live thinker of `kind`. `kind` is left as an opaque
/// integer here — the concrete thinker taxonomy belongs to the caller,
/// not to the world-physics core.
pub trait ThinkerScheduler {
    fn iterate_thinkers(&mut self, kind: i32, callback: &mut dyn FnMut(Entity));
}
