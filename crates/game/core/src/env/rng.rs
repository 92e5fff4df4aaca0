//! RNG oracle for seeded, replayable randomness.
//!
//! Every random choice in a battle or tower run (crits, status procs, enemy
//! targets, drop rolls) derives its seed from the run seed plus a roll
//! counter, so a run replays exactly from its seed.

/// Stateless, seed-in/value-out random source.
///
/// Implementations must return the same value for the same seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// True with probability `percent`/100. 0 never succeeds, 100 always does.
    fn chance(&self, seed: u64, percent: u8) -> bool {
        self.roll_d100(seed) <= u32::from(percent.min(100))
    }

    /// Uniform index in `0..len`. Returns 0 for empty ranges.
    fn pick(&self, seed: u64, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u32(seed) as usize) % len
    }
}

/// PCG-XSH-RR generator: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Derives the seed for one roll.
///
/// * `run_seed` - seed fixed when the battle or tower run starts
/// * `nonce` - roll counter, incremented after every roll
/// * `round` - current battle round (0 outside battle)
/// * `context` - distinguishes independent rolls of the same kind
pub fn compute_seed(run_seed: u64, nonce: u64, round: u32, context: u32) -> u64 {
    let mut hash = run_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (round as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // SplitMix-style avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Roll contexts used by the battle engine and tower runs.
pub mod roll {
    pub const CRIT: u32 = 1;
    pub const STATUS: u32 = 2;
    pub const ENEMY_TARGET: u32 = 3;
    pub const DROP: u32 = 4;
    pub const FLOOR: u32 = 5;
}
