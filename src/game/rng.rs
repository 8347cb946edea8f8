use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Seeds are 32-bit so they fit comfortably in a shareable link.
pub type Seed = u32;

/// Use the caller's seed, or draw a fresh one.
pub fn resolve_seed(seed: Option<Seed>) -> Seed {
    seed.unwrap_or_else(|| rand::rng().next_u32())
}

/// The random stream for one generation attempt. Attempt 0 is the plain seed;
/// retries get their own stream so they stay reproducible from the same seed.
pub fn seeded_rng(seed: Seed, attempt: u32) -> StdRng {
    StdRng::seed_from_u64(((attempt as u64) << 32) | seed as u64)
}
