// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Pedersen-style permutation commitments

use crate::context::Context;
use crate::permutation::Permutation;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{VDeserializable, VSerializable};

use rayon::prelude::*;
use tracing::instrument;

const LOG_TARGET: &str = "mixnet::commitment";

/// Default label from which the commitment generators are derived.
pub const DEFAULT_GENERATOR_LABEL: &[u8] = b"mixnet_permutation_commitment_generators";

/**
 * Commitment to a permutation matrix, column by column.
 *
 * With generators `g, h_0, .., h_{N-1}`, permutation `p` and randomizers
 * `r`, the commitment is `u_j = g^{r_j} * h_{p[j]}`. Each `u_j` is a Pedersen
 * commitment to the `j`-th column of the permutation matrix, so the vector
 * hides `p` perfectly and binds to it under the discrete logarithm
 * assumption.
 *
 * # Examples
 *
 * ```
 * use mixnet::commitment::{PermutationCommitmentScheme, DEFAULT_GENERATOR_LABEL};
 * use mixnet::context::RistrettoCtx as RCtx;
 * use mixnet::permutation::Permutation;
 *
 * let scheme = PermutationCommitmentScheme::<RCtx>::new(5, DEFAULT_GENERATOR_LABEL).unwrap();
 * let permutation = Permutation::generate::<RCtx>(5);
 * let randomizers = scheme.random_randomizers();
 *
 * let commitment = scheme.commit(&permutation, &randomizers).unwrap();
 * assert!(scheme.check_opening(&commitment, &permutation, &randomizers).unwrap());
 * ```
 */
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationCommitmentScheme<C: Context> {
    generators: Vec<C::Element>,
}

impl<C: Context> PermutationCommitmentScheme<C> {
    /// Construct a scheme for permutations of `size`, deriving the
    /// generators `h_0, .., h_{size-1}` from `label`.
    ///
    /// # Errors
    ///
    /// - `GroupOperation` if the generators cannot be derived
    pub fn new(size: usize, label: &[u8]) -> Result<Self, Error> {
        let generators = C::generators(size, label)?;

        Ok(Self { generators })
    }

    /// Construct a scheme from previously agreed generators.
    pub fn from_generators(generators: Vec<C::Element>) -> Self {
        Self { generators }
    }

    /// The commitment generators `h_0, .., h_{N-1}`.
    #[must_use]
    pub fn generators(&self) -> &[C::Element] {
        &self.generators
    }

    /// The permutation size `N`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.generators.len()
    }

    /// Sample `N` uniform randomizers with the context rng.
    #[must_use]
    pub fn random_randomizers(&self) -> Vec<C::Scalar> {
        self.random_randomizers_with(&mut C::get_rng())
    }

    /// Sample `N` uniform randomizers with the given rng.
    pub fn random_randomizers_with<R: CRng>(&self, rng: &mut R) -> Vec<C::Scalar> {
        (0..self.size()).map(|_| C::Scalar::random(rng)).collect()
    }

    /// Commit to `permutation` with the given randomizers.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the permutation or the randomizers are not of size `N`
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(size = self.size()))]
    pub fn commit(
        &self,
        permutation: &Permutation,
        randomizers: &[C::Scalar],
    ) -> Result<PermutationCommitment<C>, Error> {
        self.check_dimensions(permutation, randomizers)?;

        let h_permuted = permutation.apply_refs(&self.generators)?;
        let u_n: Vec<C::Element> = h_permuted
            .into_par_iter()
            .zip(randomizers.par_iter())
            .map(|(h, r)| C::G::g_exp(r).mul(h))
            .collect();

        Ok(PermutationCommitment(u_n))
    }

    /// Check that `(permutation, randomizers)` opens `commitment`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the permutation or the randomizers are not of size `N`
    pub fn check_opening(
        &self,
        commitment: &PermutationCommitment<C>,
        permutation: &Permutation,
        randomizers: &[C::Scalar],
    ) -> Result<bool, Error> {
        let recomputed = self.commit(permutation, randomizers)?;

        Ok(recomputed == *commitment)
    }

    fn check_dimensions(
        &self,
        permutation: &Permutation,
        randomizers: &[C::Scalar],
    ) -> Result<(), Error> {
        for found in [permutation.len(), randomizers.len()] {
            if found != self.size() {
                return Err(Error::DimensionMismatch {
                    expected: self.size(),
                    found,
                });
            }
        }

        Ok(())
    }
}

/**
 * A permutation commitment `u_0, .., u_{N-1}`.
 *
 * Two commitments are the same commitment exactly when their serializations
 * are identical, which is what the verifier checks before accepting a pair
 * of proofs.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationCommitment<C: Context>(pub Vec<C::Element>);

impl<C: Context> PermutationCommitment<C> {
    /// The committed elements.
    #[must_use]
    pub fn elements(&self) -> &[C::Element] {
        &self.0
    }

    /// The commitment size `N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the commitment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Context> VSerializable for PermutationCommitment<C> {
    fn ser(&self) -> Vec<u8> {
        self.0.ser()
    }
}

impl<C: Context> VDeserializable for PermutationCommitment<C> {
    fn deser(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self(Vec::<C::Element>::deser(buffer)?))
    }
}
