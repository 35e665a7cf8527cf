use bitflags::bitflags;

bitflags! {
    /// Behaviour / collision flags carried by every **mobj** at runtime.
    ///
    /// Numeric values for the first block are copied 1-for-1 from the
    /// original `doom/info.h`-derived layout; bits added to cover flags the
    /// movement/hitscan core also needs are allocated from the next free
    /// positions.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MobjFlags: u32 {
        // Call `TouchSpecial` when touched.
        const SPECIAL        = 0x0000_0001;
        // Blocks movement.
        const SOLID          = 0x0000_0002;
        // Can be hit by bullets/projectiles.
        const SHOOTABLE      = 0x0000_0004;
        // Invisible to sector links, still touchable.
        const NOSECTOR       = 0x0000_0008;
        // Removed from blockmap, still simulated.
        const NOBLOCKMAP     = 0x0000_0010;

        // AI / spawn modifiers
        const AMBUSH         = 0x0000_0020;
        const JUSTHIT        = 0x0000_0040;
        const JUSTATTACKED   = 0x0000_0080;
        const SPAWNCEILING   = 0x0000_0100;
        const NOGRAVITY      = 0x0000_0200;

        // Movement-related
        const DROPOFF        = 0x0000_0400;
        const PICKUP         = 0x0000_0800;
        const NOCLIP         = 0x0000_1000;
        const SLIDE          = 0x0000_2000;
        const FLOAT          = 0x0000_4000;
        const TELEPORT       = 0x0000_8000;

        // Projectiles / drops
        const MISSILE        = 0x0001_0000;
        const DROPPED        = 0x0002_0000;

        // Rendering / damage tweaks
        const SHADOW         = 0x0004_0000;
        const NOBLOOD        = 0x0008_0000;
        const CORPSE         = 0x0010_0000;
        const INFLOAT        = 0x0020_0000;

        // Inter-mission counters
        const COUNTKILL      = 0x0040_0000;
        const COUNTITEM      = 0x0080_0000;

        // Special cases
        const SKULLFLY       = 0x0100_0000;
        const NOTDMATCH      = 0x0200_0000;

        // Upper two bits encode multiplayer palette translation.
        const TRANSLATION    = 0x0C00_0000;

        // --- movement-engine extensions (spec data model) ---
        const TELESTOMP      = 0x1000_0000;
        const PUSHABLE       = 0x2000_0000;
        const CANNOT_PUSH    = 0x4000_0000;
        const PASSMOBJ       = 0x8000_0000;
    }
}

bitflags! {
    /// Flags that did not fit in the legacy 32-bit word. Spec names several
    /// more behaviour bits than the original flag set provides room for.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MobjFlags2: u32 {
        const INVULNERABLE   = 0x0000_0001;
        const BOSS           = 0x0000_0002;
        const THRUGHOST      = 0x0000_0004;
        const FLOORCLIP      = 0x0000_0008;
        const FLOORBOUNCE    = 0x0000_0010;
        const BLASTED        = 0x0000_0020;
        const REFLECTIVE     = 0x0000_0040;
        const PCROSS         = 0x0000_0080;
        const MCROSS         = 0x0000_0100;
        const RIP            = 0x0000_0200;
    }
}

/// Bit-shift used to extract the player-colour translation (0..3) from
/// the upper bits of `MobjFlags::TRANSLATION`.
pub const MF_TRANSSHIFT: u32 = 26;

/// Recorded in `Mobj::damage` to mean "use the type's definition damage
/// instead" — a historical save-format omission, preserved verbatim
/// (see the Open Questions in DESIGN.md).
pub const DAMAGE_USE_DEFINITION: i32 = i32::MAX;
