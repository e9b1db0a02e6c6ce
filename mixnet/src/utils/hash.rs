// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Hashing utilities
//!
//! Every hash in this crate goes through [`update_hasher`], which length-prefixes
//! each input and its domain separation tag so that distinct sequences of inputs
//! can never produce the same hasher state.

use sha3::Digest;

/// Sha3-256, used by the P-256 context.
pub type Hasher256 = sha3::Sha3_256;

/// Sha3-512, used by the Ristretto context.
pub type Hasher512 = sha3::Sha3_512;

/**
 * Hashing [context][`crate::context::Context`] dependency.
 */
pub trait Hasher: Digest + Clone + Send + Sync {
    /// Returns a fresh hasher instance.
    #[must_use]
    fn hasher() -> Self {
        Self::new()
    }
}

impl Hasher for Hasher256 {}
impl Hasher for Hasher512 {}

/// Feeds the given inputs into the hasher, each preceded by its domain
/// separation tag. Lengths are written as big endian `u64`.
///
/// Inputs without a matching tag are tagged with the empty string.
pub fn update_hasher<H: Digest>(hasher: &mut H, input_slices: &[&[u8]], ds_tags: &[&[u8]]) {
    for (i, input) in input_slices.iter().enumerate() {
        let tag: &[u8] = ds_tags.get(i).copied().unwrap_or_default();
        hasher.update((tag.len() as u64).to_be_bytes());
        hasher.update(tag);
        hasher.update((input.len() as u64).to_be_bytes());
        hasher.update(input);
    }
}

/// Interprets the first 32 bytes of `digest` as a little endian integer and
/// keeps only its lowest `bits` bits.
///
/// Digests shorter than 32 bytes are zero-extended. `bits` values of 256 or
/// more keep the whole 32 bytes.
#[must_use]
pub fn truncate_to_bits(digest: &[u8], bits: usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (o, d) in out.iter_mut().zip(digest.iter()) {
        *o = *d;
    }
    for (i, byte) in out.iter_mut().enumerate() {
        let low = i * 8;
        if low >= bits {
            *byte = 0;
        } else if bits - low < 8 {
            *byte &= (1u8 << (bits - low)) - 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_bits() {
        let digest = [0xffu8; 64];

        let t = truncate_to_bits(&digest, 12);
        assert_eq!(t[0], 0xff);
        assert_eq!(t[1], 0x0f);
        assert!(t[2..].iter().all(|b| *b == 0));

        let t = truncate_to_bits(&digest, 256);
        assert!(t.iter().all(|b| *b == 0xff));

        let t = truncate_to_bits(&digest[..3], 80);
        assert_eq!(&t[..3], &[0xff, 0xff, 0xff]);
        assert!(t[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_update_hasher_is_injective_on_boundaries() {
        let mut h1 = Hasher256::hasher();
        update_hasher(&mut h1, &[b"ab", b"c"], &[b"x", b"y"]);
        let mut h2 = Hasher256::hasher();
        update_hasher(&mut h2, &[b"a", b"bc"], &[b"x", b"y"]);

        assert_ne!(h1.finalize(), h2.finalize());
    }
}
