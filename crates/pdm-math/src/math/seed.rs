//! Deterministic pseudo-random draws keyed by a string seed.
//!
//! The same seed yields the same draw on every run and platform. Analyses
//! of the same asset therefore reproduce identical numbers.

/// Fold `seed` into a wrapping 32-bit accumulator (`acc * 31 + unit`).
///
/// Iterates UTF-16 code units so non-ASCII seeds (`ΔT`, `°C`) fold the same
/// way regardless of how the string is stored.
pub fn seed_hash(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |acc, unit| {
        acc.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Draw in `[0, 1)` with three decimal digits of resolution.
pub fn pseudo_random(seed: &str) -> f64 {
    let magnitude = seed_hash(seed).unsigned_abs();
    f64::from(magnitude % 1000) / 1000.0
}

/// Draw for a seed composed of a base and a salt (`asset + feature`).
pub fn pseudo_random_salted(base: &str, salt: &str) -> f64 {
    let mut seed = String::with_capacity(base.len() + salt.len());
    seed.push_str(base);
    seed.push_str(salt);
    pseudo_random(&seed)
}
