//! Animation/behaviour states.
//!
//! The original engine drives each mobj through a `state_t` table compiled
//! from `info.c` (sprite, duration, action function, next state). This crate
//! does not render sprites, so `State` only carries what the movement core
//! needs: a tic duration and a successor, plus the handful of named states
//! the collision/crush/puff code references directly.

/// One entry in a mobj's animation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Spawn,
    See,
    Melee,
    Missile,
    Death,
    XDeath,
    Raise,
    Gibs,
    Corpse,
    Puff1,
    Puff2,
    Puff3,
    Blood1,
    Blood2,
    Blood3,
    PlayIdle,
    PlayRun1,
    PlayRun2,
    PlayRun3,
    PlayRun4,
    /// Terminal marker: the thinker removes the mobj when it's reached.
    Remove,
}

impl State {
    /// Tics this state persists before advancing (35 Hz tics, matching
    /// `SIM_FPS`). `0` means "never advances on its own".
    pub const fn tics(self) -> i32 {
        match self {
            State::Spawn => 0,
            State::See => 4,
            State::Melee => 8,
            State::Missile => 6,
            State::Death => 10,
            State::XDeath => 10,
            State::Raise => 6,
            State::Gibs => 0,
            State::Corpse => 0,
            State::Puff1 => 4,
            State::Puff2 => 4,
            State::Puff3 => 4,
            State::Blood1 => 8,
            State::Blood2 => 8,
            State::Blood3 => 8,
            State::PlayIdle => 0,
            State::PlayRun1 | State::PlayRun2 | State::PlayRun3 | State::PlayRun4 => 4,
            State::Remove => 0,
        }
    }

    /// Successor state in the default chain. Death/puff/blood sequences
    /// terminate in `Remove`; idle/spawn states loop to themselves.
    pub const fn next(self) -> State {
        match self {
            State::Spawn => State::Spawn,
            State::See => State::See,
            State::Melee => State::Spawn,
            State::Missile => State::Spawn,
            State::Death => State::XDeath,
            State::XDeath => State::Corpse,
            State::Raise => State::Spawn,
            State::Gibs => State::Gibs,
            State::Corpse => State::Corpse,
            State::Puff1 => State::Puff2,
            State::Puff2 => State::Puff3,
            State::Puff3 => State::Remove,
            State::Blood1 => State::Blood2,
            State::Blood2 => State::Blood3,
            State::Blood3 => State::Remove,
            State::PlayIdle => State::PlayIdle,
            State::PlayRun1 => State::PlayRun2,
            State::PlayRun2 => State::PlayRun3,
            State::PlayRun3 => State::PlayRun4,
            State::PlayRun4 => State::PlayRun1,
            State::Remove => State::Remove,
        }
    }
}
