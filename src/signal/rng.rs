//! Noise RNG construction.
//!
//! All noise draws go through PCG32 so a seeded take can be regenerated
//! sample-for-sample.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Creates a PCG32 RNG from the given seed, or from OS entropy when absent.
pub fn rng_for_seed(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => create_rng(seed),
        None => Pcg32::from_entropy(),
    }
}
