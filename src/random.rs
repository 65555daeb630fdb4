//! Seeded random sources.
//!
//! A run owns exactly one [`StdRng`], seeded once. Work that fans out over
//! the population draws a base seed from it and gives every task its own
//! generator via [`task_rng`], so the outcome does not depend on how tasks
//! are scheduled across threads.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Mixes a base seed with a stream index (SplitMix64 finaliser).
///
/// Neighbouring streams produce unrelated seeds.
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base.wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Generator for the `stream`-th task of a fan-out keyed by `base`.
pub fn task_rng(base: u64, stream: u64) -> StdRng {
    create_rng(derive_seed(base, stream))
}
