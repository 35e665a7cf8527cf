//! Per-type mobj descriptors.
//!
//! The original engine dispatches monster-specific behaviour through a
//! `mobjtype_t` enum and long `switch` ladders (missile rules, death
//! handling, terrain response all keyed off `thing->type`). Per the design
//! notes this port replaces the switch ladders with one static descriptor
//! per type, carrying plain data plus a couple of function pointers for the
//! behaviour that really does vary per type. The tick/collision code
//! dispatches through `&'static MobjInfo` instead of matching on a type tag.

use crate::defs::flags::{MobjFlags, MobjFlags2};
use crate::defs::state::State;

/// Terrain feedback a mobj produces when it settles onto a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainResponse {
    /// No special effect (ordinary floor).
    None,
    /// Leaves a splash effect appropriate for liquids.
    Splash,
    /// Sinks into the floor clip amount recorded by the terrain table.
    FloorClip,
}

/// Scales incoming damage for a specific mobj type before `GameRules`
/// applies it. Most types pass the amount through unchanged.
pub type DamageRule = fn(base: i32) -> i32;

/// Computes this type's terrain response; most types ignore the floor
/// entirely.
pub type TerrainRule = fn() -> TerrainResponse;

fn damage_identity(base: i32) -> i32 {
    base
}

fn damage_halved(base: i32) -> i32 {
    (base + 1) / 2
}

fn terrain_none() -> TerrainResponse {
    TerrainResponse::None
}

fn terrain_floor_clip() -> TerrainResponse {
    TerrainResponse::FloorClip
}

/// Static, load-time-immutable description of one mobj type.
#[derive(Debug, Clone, Copy)]
pub struct MobjInfo {
    pub id: &'static str,
    pub doomednum: i32,
    pub spawnstate: State,
    pub spawnhealth: i32,
    pub seestate: State,
    pub painstate: State,
    pub painchance: i32,
    pub meleestate: State,
    pub missilestate: State,
    pub deathstate: State,
    pub xdeathstate: State,
    pub raisestate: State,
    pub radius: f32,
    pub height: f32,
    pub mass: i32,
    pub speed: f32,
    pub damage: i32,
    pub flags: MobjFlags,
    pub flags2: MobjFlags2,
    pub damage_rule: DamageRule,
    pub terrain_rule: TerrainRule,
}

impl MobjInfo {
    /// Apply this type's `damage_rule` to an incoming damage amount,
    /// resolving the historical "use the type's damage" sentinel along
    /// the way (see `DAMAGE_USE_DEFINITION`).
    pub fn scale_damage(&self, amount: i32) -> i32 {
        use crate::defs::flags::DAMAGE_USE_DEFINITION;
        let amount = if amount == DAMAGE_USE_DEFINITION {
            self.damage
        } else {
            amount
        };
        (self.damage_rule)(amount)
    }

    pub fn terrain_response(&self) -> TerrainResponse {
        (self.terrain_rule)()
    }
}

pub static PLAYER: MobjInfo = MobjInfo {
    id: "PLAYER",
    doomednum: 1,
    spawnstate: State::PlayIdle,
    spawnhealth: 100,
    seestate: State::PlayRun1,
    painstate: State::PlayIdle,
    painchance: 255,
    meleestate: State::Spawn,
    missilestate: State::Spawn,
    deathstate: State::Death,
    xdeathstate: State::XDeath,
    raisestate: State::Spawn,
    radius: 16.0,
    height: 56.0,
    mass: 100,
    speed: 0.0,
    damage: 0,
    flags: MobjFlags::SOLID
        .union(MobjFlags::SHOOTABLE)
        .union(MobjFlags::DROPOFF)
        .union(MobjFlags::PICKUP)
        .union(MobjFlags::NOTDMATCH),
    flags2: MobjFlags2::empty(),
    damage_rule: damage_identity,
    terrain_rule: terrain_floor_clip,
};

pub static ZOMBIEMAN: MobjInfo = MobjInfo {
    id: "ZOMBIEMAN",
    doomednum: 3004,
    spawnstate: State::Spawn,
    spawnhealth: 20,
    seestate: State::See,
    painstate: State::Spawn,
    painchance: 200,
    meleestate: State::Melee,
    missilestate: State::Missile,
    deathstate: State::Death,
    xdeathstate: State::XDeath,
    raisestate: State::Raise,
    radius: 20.0,
    height: 56.0,
    mass: 100,
    speed: 8.0,
    damage: 3,
    flags: MobjFlags::SOLID
        .union(MobjFlags::SHOOTABLE)
        .union(MobjFlags::COUNTKILL),
    flags2: MobjFlags2::empty(),
    damage_rule: damage_identity,
    terrain_rule: terrain_none,
};

pub static ROCKET: MobjInfo = MobjInfo {
    id: "ROCKET",
    doomednum: -1,
    spawnstate: State::Spawn,
    spawnhealth: 1000,
    seestate: State::Spawn,
    painstate: State::Spawn,
    painchance: 0,
    meleestate: State::Spawn,
    missilestate: State::Spawn,
    deathstate: State::Death,
    xdeathstate: State::Death,
    raisestate: State::Spawn,
    radius: 11.0,
    height: 8.0,
    mass: 100,
    speed: 20.0,
    damage: 20,
    flags: MobjFlags::MISSILE
        .union(MobjFlags::NOGRAVITY)
        .union(MobjFlags::DROPOFF),
    flags2: MobjFlags2::empty(),
    damage_rule: damage_identity,
    terrain_rule: terrain_none,
};

pub static PUFF: MobjInfo = MobjInfo {
    id: "PUFF",
    doomednum: -1,
    spawnstate: State::Puff1,
    spawnhealth: 1000,
    seestate: State::Spawn,
    painstate: State::Spawn,
    painchance: 0,
    meleestate: State::Spawn,
    missilestate: State::Spawn,
    deathstate: State::Spawn,
    xdeathstate: State::Spawn,
    raisestate: State::Spawn,
    radius: 2.0,
    height: 2.0,
    mass: 100,
    speed: 0.0,
    damage: 0,
    flags: MobjFlags::NOBLOCKMAP.union(MobjFlags::NOGRAVITY),
    flags2: MobjFlags2::empty(),
    damage_rule: damage_identity,
    terrain_rule: terrain_none,
};

pub static BLOOD: MobjInfo = MobjInfo {
    id: "BLOOD",
    doomednum: -1,
    spawnstate: State::Blood1,
    spawnhealth: 1000,
    seestate: State::Spawn,
    painstate: State::Spawn,
    painchance: 0,
    meleestate: State::Spawn,
    missilestate: State::Spawn,
    deathstate: State::Spawn,
    xdeathstate: State::Spawn,
    raisestate: State::Spawn,
    radius: 2.0,
    height: 2.0,
    mass: 100,
    speed: 0.0,
    damage: 0,
    flags: MobjFlags::NOBLOCKMAP.union(MobjFlags::NOGRAVITY),
    flags2: MobjFlags2::empty(),
    damage_rule: damage_halved,
    terrain_rule: terrain_none,
};

/// Every built-in descriptor, for lookup-by-name in tests and the demo
/// binary. The real engine builds this from `info.c` via a code-generation
/// step (see `tools/gen_mobjinfo.rs` in the teacher lineage); this crate
/// hand-authors a small fixed set sufficient to exercise every operation
/// the movement/hitscan core defines.
pub static MOBJINFO: &[&MobjInfo] = &[&PLAYER, &ZOMBIEMAN, &ROCKET, &PUFF, &BLOOD];
