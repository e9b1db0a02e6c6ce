// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Zero knowledge proofs of shuffle
//!
//! The Terelius-Wikstrom proof of shuffle, split into two Sigma protocols
//! that share a permutation commitment:
//!
//! - [`permutation`]: the commitment `u` commits to a permutation matrix.
//! - [`shuffle`]: the output ciphertexts are the input ciphertexts,
//!   re-encrypted and permuted by the permutation committed in `u`.
//!
//! [`verifier`] checks both proofs together with the identity of the
//! commitment they refer to. Challenges come from a
//! [`ChallengeSource`][`challenge::ChallengeSource`], either Fiat-Shamir or
//! interactive.

use crate::context::Context;
use crate::cryptosystem::elgamal::Ciphertext;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::rng::CRng;

use rayon::prelude::*;
use std::array;

/// Challenge sources: Fiat-Shamir and interactive.
pub mod challenge;

/// Proof that a vector of elements commits to a permutation.
pub mod permutation;

/// Proof that a batch of ciphertexts is a re-encryption shuffle of another.
pub mod shuffle;

/// Transcripts feeding challenge derivation.
pub mod transcript;

/// Combined verification of both proofs.
pub mod verifier;

/// A scalar uniform in `[0, 2^bits)`.
pub(crate) fn random_bounded<C: Context, R: CRng>(rng: &mut R, bits: usize) -> C::Scalar {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);

    challenge::bounded_scalar::<C>(&bytes, bits)
}

/// `sum a_i * b_i`
pub(crate) fn inner_product<C: Context>(a: &[C::Scalar], b: &[C::Scalar]) -> C::Scalar {
    a.par_iter()
        .zip(b.par_iter())
        .map(|(x, y)| x.mul(y))
        .reduce(C::Scalar::zero, |x, y| x.add(&y))
}

/// `prod c_i^{s_i}`, one multi-exponentiation per ciphertext component.
pub(crate) fn ciphertext_multi_exp<C: Context, const W: usize>(
    ciphertexts: &[Ciphertext<C, W>],
    scalars: &[C::Scalar],
) -> Ciphertext<C, W> {
    let component = |part: usize, k: usize| {
        let bases: Vec<C::Element> = ciphertexts.iter().map(|c| c.0[part][k].clone()).collect();
        C::G::multi_exp(&bases, scalars)
    };

    Ciphertext::new(array::from_fn(|k| component(0, k)), array::from_fn(|k| component(1, k)))
}

/// Fails with `DimensionMismatch` unless `found == expected`.
pub(crate) fn check_len(expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, found })
    }
}

/// Challenges replayed for a transcript that was never answered mean the
/// proof does not match the interaction; that is a rejection, not an error.
pub(crate) fn replayed<T>(challenge: Result<T, Error>) -> Result<Option<T>, Error> {
    match challenge {
        Ok(value) => Ok(Some(value)),
        Err(Error::UnknownTranscript) => Ok(None),
        Err(e) => Err(e),
    }
}
