//! `P_Random`-equivalent deterministic RNG: a single index into a fixed
//! 256-entry table, advanced by one each call. Demo/netplay correctness
//! depends on every consumer pulling from this one sequence rather than
//! `rand`'s thread-local state, which is why this isn't built on top of
//! the `rand` crate despite the teacher otherwise favoring small focused
//! crates — determinism here is a correctness requirement, not a nicety.

/// The classic 256-byte Doom randomization table.
#[rustfmt::skip]
const RNG_TABLE: [u8; 256] = [
    0, 8, 109, 220, 222, 241, 149, 107, 75, 248, 254, 140, 16, 66,
    74, 21, 211, 47, 80, 242, 154, 27, 205, 128, 161, 89, 77, 36,
    95, 110, 85, 48, 212, 140, 211, 249, 22, 79, 200, 50, 28, 188,
    52, 140, 202, 120, 68, 145, 62, 70, 184, 190, 91, 197, 152, 224,
    149, 104, 25, 178, 252, 182, 202, 182, 141, 197, 4, 81, 181, 242,
    145, 42, 39, 227, 156, 198, 225, 193, 219, 93, 122, 175, 249, 0,
    175, 143, 70, 239, 46, 246, 163, 53, 163, 109, 168, 135, 2, 235,
    25, 92, 20, 145, 138, 77, 69, 166, 78, 176, 173, 212, 166, 113,
    94, 161, 41, 50, 239, 49, 111, 164, 70, 60, 2, 37, 171, 75,
    136, 156, 11, 56, 42, 146, 138, 229, 73, 146, 77, 61, 98, 196,
    135, 106, 63, 197, 195, 86, 96, 203, 113, 101, 170, 247, 181, 113,
    80, 250, 108, 7, 255, 237, 129, 226, 79, 107, 112, 166, 103, 241,
    24, 223, 239, 120, 198, 58, 60, 82, 128, 3, 184, 66, 143, 224,
    145, 224, 81, 206, 163, 45, 63, 90, 168, 114, 59, 33, 159, 95,
    28, 139, 123, 98, 125, 196, 15, 70, 194, 253, 54, 14, 109, 226,
    71, 17, 161, 93, 186, 87, 244, 138, 20, 52, 123, 251, 26, 36,
    17, 46, 52, 231, 232, 76, 31, 221, 84, 37, 216, 165, 212, 106,
    197, 242, 98, 43, 39, 175, 254, 145, 190, 84, 118, 222, 187, 136,
    120, 163, 236, 249,
];

/// A single deterministic random stream, index-addressed like the
/// original's global `rndindex`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rng {
    index: u8,
}

impl Rng {
    pub fn new(seed: u8) -> Rng {
        Rng { index: seed }
    }

    /// `P_Random()`: returns the next table entry, 0..=255.
    pub fn random(&mut self) -> u8 {
        self.index = self.index.wrapping_add(1);
        RNG_TABLE[self.index as usize]
    }

    /// `P_SubRandom()`: a signed -255..=255 step, used for spray/knockback
    /// jitter (`random() - random()`).
    pub fn sub_random(&mut self) -> i32 {
        self.random() as i32 - self.random() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_deterministic_from_the_same_seed() {
        let mut a = Rng::new(0);
        let mut b = Rng::new(0);
        let seq_a: Vec<u8> = (0..10).map(|_| a.random()).collect();
        let seq_b: Vec<u8> = (0..10).map(|_| b.random()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn wraps_around_after_256_draws() {
        let mut rng = Rng::new(0);
        let first = rng.random();
        for _ in 0..255 {
            rng.random();
        }
        assert_eq!(rng.random(), first);
    }
}
