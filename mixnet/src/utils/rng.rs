// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Random number generation

use rand::rngs::OsRng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/**
 * Marker trait to require a cryptographically secure random number generator.
 */
pub trait CRng: rand::RngCore + rand::CryptoRng {}

/**
 * `OsRng` is a cryptographically secure random number generator.
 */
impl CRng for OsRng {}

/**
 * `ChaCha20Rng` is a cryptographically secure, seedable random number generator.
 *
 * Used wherever a run must be reproducible, for example when a test or an
 * audit replays a shuffle from a recorded seed.
 */
impl CRng for ChaCha20Rng {}

/**
 * Random number generation [context][`crate::context::Context`] dependency.
 *
 * Allows retrieving an rng instance in some [Context][`crate::context::Context`].
 */
pub trait Rng: CRng {
    /// Returns an rng instance.
    fn rng() -> Self;
}

/**
 * Implements the random number generation [context][`crate::context::Context`] dependency with [`OsRng`].
 */
impl Rng for OsRng {
    fn rng() -> OsRng {
        rand::rngs::OsRng
    }
}

/// Returns a deterministic rng seeded with the given bytes.
#[must_use]
pub fn seeded(seed: [u8; 32]) -> ChaCha20Rng {
    ChaCha20Rng::from_seed(seed)
}

/// Returns a deterministic rng seeded with a `u64`.
#[must_use]
pub fn seeded_from_u64(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = seeded_from_u64(7);
        let mut b = seeded_from_u64(7);
        let mut c = seeded_from_u64(8);

        let (x, y, z) = (a.next_u64(), b.next_u64(), c.next_u64());
        assert_eq!(x, y);
        assert_ne!(x, z);
    }
}
