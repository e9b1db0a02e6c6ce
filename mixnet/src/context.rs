// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Group, hash and randomness choices the mixnet is instantiated with.

use rand::rngs::OsRng;

use crate::groups::P256Group;
use crate::groups::Ristretto255Group;
use crate::traits::groups::BaseScalar;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::utils::error::Error;
use crate::utils::hash::Hasher;
use crate::utils::rng::Rng;
use crate::utils::serialization::{FDeserializable, FSerializable};

/**
 * The setting a mix runs in: a prime-order group, the hash function used
 * for Fiat-Shamir challenges and generator derivation, and the source of
 * fresh randomness.
 *
 * - Ciphertexts, commitments and proofs hold [elements][`Context::Element`]
 *   and [scalars][`Context::Scalar`] of the [group][`Context::G`]; ciphertext
 *   components of width `W` live in the
 *   [product group][`crate::groups::productgroup`].
 * - Elements and scalars have canonical fixed length encodings. Transcripts
 *   hash these encodings, and the verifier compares commitments through them.
 * - [`Context::Rng`] samples permutations, randomizations and proof masks
 *   unless the caller passes a seeded rng to a `*_with` function.
 *
 * The mixer, the commitment scheme and both proof systems are generic over
 * this trait. It is sealed: the available contexts are [`RistrettoCtx`] and
 * [`P256Ctx`].
 */
pub trait Context: private::Sealed + std::fmt::Debug + PartialEq + Clone + Send + Sync + 'static {
    /// Group elements: commitments, ciphertext components, generators.
    type Element: GroupElement<Scalar = Self::Scalar>
        + FSerializable
        + FDeserializable
        + Clone
        + Send
        + Sync;

    /// Exponents: randomizers, challenges and responses.
    type Scalar: BaseScalar + FSerializable + FDeserializable + Clone + Send + Sync + From<u32>;

    /// Hash for challenges and generator derivation.
    type Hasher: Hasher;

    /// Source of fresh randomness.
    type Rng: Rng;

    /// The prime-order group.
    type G: CryptographicGroup<Element = Self::Element, Scalar = Self::Scalar, Hasher = Self::Hasher>;

    /// Returns a fresh random number generator.
    #[inline]
    #[must_use]
    fn get_rng() -> Self::Rng {
        Self::Rng::rng()
    }

    /// Returns a fresh hasher.
    #[inline]
    #[must_use]
    fn get_hasher() -> Self::Hasher {
        Self::Hasher::hasher()
    }

    /// A uniformly random group element, such as a test plaintext.
    #[inline]
    #[must_use]
    fn random_element() -> Self::Element {
        Self::G::random_element(&mut Self::get_rng())
    }

    /// A uniformly random scalar.
    #[inline]
    #[must_use]
    fn random_scalar() -> Self::Scalar {
        Self::G::random_scalar(&mut Self::get_rng())
    }

    /// The fixed generator `g`.
    #[inline]
    #[must_use]
    fn generator() -> Self::Element {
        Self::G::generator()
    }

    /// `count` generators with unknown discrete logarithms relative to `g`
    /// and to each other, derived from `label` by hashing to the group.
    ///
    /// # Errors
    ///
    /// - `GroupOperation` if hashing to the group fails
    #[inline]
    fn generators(count: usize, label: &[u8]) -> Result<Vec<Self::Element>, Error> {
        Self::G::ind_generators(count, label)
    }
}

/**
 * Ristretto255 with Sha3-512 and `OsRng`.
 *
 * The faster of the two contexts; group order of 253 bits.
 */
#[derive(Debug, PartialEq, Clone, Hash)]
pub struct RistrettoCtx;

impl Context for RistrettoCtx {
    type Element = <Self::G as CryptographicGroup>::Element;
    type Scalar = <Self::G as CryptographicGroup>::Scalar;
    type Hasher = <Self::G as CryptographicGroup>::Hasher;
    type Rng = OsRng;

    type G = Ristretto255Group;
}

/**
 * NIST P-256 with Sha3-256 and `OsRng`.
 *
 * Group order of 256 bits; elements encode as compressed SEC1 points.
 */
#[derive(Debug, PartialEq, Clone, Hash)]
pub struct P256Ctx;

impl Context for P256Ctx {
    type Element = <Self::G as CryptographicGroup>::Element;
    type Scalar = <Self::G as CryptographicGroup>::Scalar;
    type Hasher = <Self::G as CryptographicGroup>::Hasher;
    type Rng = OsRng;

    type G = P256Group;
}

mod private {
    /// Only the contexts of this crate implement [`Context`][`super::Context`].
    pub trait Sealed {}
}

impl private::Sealed for RistrettoCtx {}
impl private::Sealed for P256Ctx {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_ristretto() {
        test_generators::<RistrettoCtx>();
    }

    #[test]
    fn test_generators_p256() {
        test_generators::<P256Ctx>();
    }

    fn test_generators<C: Context>() {
        let first = C::generators(4, b"label").unwrap();
        let again = C::generators(4, b"label").unwrap();
        let other = C::generators(4, b"other label").unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert!(!first.contains(&C::generator()));
        assert!(C::generators(0, b"label").unwrap().is_empty());
    }
}
