//! Runtime-tunable console variables the movement/hitscan core consults.
//!
//! The original keeps these as process-wide globals set once at boot from
//! parsed cvars; here they're a plain value threaded in by the caller,
//! removing the global the same way [`crate::movement::MoveContext`]
//! removes the `tm*` workspace.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// `-1` means "use the map's default gravity"; otherwise a per-tick
    /// acceleration expressed as map-units/tic².
    pub net_gravity: i32,
    /// AI-only ledge fear: non-`DROPOFF` mobs refuse to walk off a floor
    /// more than a step height above the destination's lowest floor.
    pub avoid_dropoffs: bool,
    /// Lets `FLOAT` monsters stand on top of solid mobjs instead of
    /// treating them as always-blocking.
    pub allow_monster_float_over_blocking: bool,
    /// Enforce vertical non-overlap during horizontal move tests
    /// (`PIT_CheckThing`'s stand-on-top pass-over rule).
    pub move_check_z: bool,
    /// Disables vertical autoaim narrowing in `aim_line_attack`.
    pub no_auto_aim: bool,
    /// Player eye height above their Z, in map units.
    pub plr_view_height: f32,
    /// Excludes Z from `radius_attack`'s Manhattan distance figure.
    pub net_no_max_z_radius_attack: bool,
    /// Caps pushable-momentum transfer to the pusher's own momentum.
    pub pushable_momentum_limited_to_pusher: bool,
    /// Heretic-specific: staff power damages ghosts. Harmless no-op for
    /// games without the concept; kept for parity with spec §6.
    pub staff_power_damage_to_ghosts: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            net_gravity: -1,
            avoid_dropoffs: false,
            allow_monster_float_over_blocking: false,
            move_check_z: false,
            no_auto_aim: false,
            plr_view_height: 41.0,
            net_no_max_z_radius_attack: false,
            pushable_momentum_limited_to_pusher: false,
            staff_power_damage_to_ghosts: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_vanilla_gravity_sentinel() {
        let cfg = Config::default();
        assert_eq!(cfg.net_gravity, -1);
        assert!(!cfg.avoid_dropoffs);
    }
}
