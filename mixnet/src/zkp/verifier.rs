// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Verification of a complete shuffle, and a mix server producing one

use crate::commitment::{PermutationCommitment, PermutationCommitmentScheme, DEFAULT_GENERATOR_LABEL};
use crate::config::ProofConfig;
use crate::context::Context;
use crate::cryptosystem::elgamal::{Ciphertext, PublicKey};
use crate::mixer::ReEncryptionMixer;
use crate::permutation::Permutation;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::VSerializable;
use crate::zkp::challenge::{ChallengeSource, FiatShamir};
use crate::zkp::check_len;
use crate::zkp::permutation::{PermutationCommitmentProofSystem, PermutationProof};
use crate::zkp::shuffle::{ReEncryptionShuffleProofSystem, ShuffleProof};
use crate::zkp::shuffle::{ShufflePrivateInput, ShufflePublicInput};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::instrument;

const LOG_TARGET: &str = "mixnet::zkp::verifier";

/**
 * Verifies a shuffle: a permutation proof and a shuffle proof that must
 * refer to the same permutation commitment.
 *
 * Each proof on its own says nothing about the other's commitment. A shuffle
 * proof against a commitment that is not a permutation commitment is
 * meaningless, so the commitment checked by the permutation proof must be
 * bit-identical to the commitment in the shuffle statement.
 */
#[derive(Debug)]
pub struct ShuffleVerifier<'a, C: Context, S: ChallengeSource<C>, const W: usize> {
    permutation_system: &'a PermutationCommitmentProofSystem<C, S>,
    shuffle_system: &'a ReEncryptionShuffleProofSystem<C, S, W>,
}

impl<'a, C: Context, S: ChallengeSource<C>, const W: usize> ShuffleVerifier<'a, C, S, W> {
    /// Combine two proof systems into a shuffle verifier.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the systems have different sizes
    /// - `GeneratorMismatch` if they use different commitment generators
    pub fn new(
        permutation_system: &'a PermutationCommitmentProofSystem<C, S>,
        shuffle_system: &'a ReEncryptionShuffleProofSystem<C, S, W>,
    ) -> Result<Self, Error> {
        let n = permutation_system.size();
        check_len(n, shuffle_system.size())?;

        let differing = permutation_system
            .generators()
            .iter()
            .zip(shuffle_system.generators())
            .position(|(a, b)| a != b);
        if let Some(index) = differing {
            return Err(Error::GeneratorMismatch { index });
        }

        Ok(Self {
            permutation_system,
            shuffle_system,
        })
    }

    /// The shuffle size `N`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.permutation_system.size()
    }

    /// Verify a shuffle.
    ///
    /// Accepts exactly when `permutation_commitment` is bit-identical to the
    /// commitment in `public`, the permutation proof verifies on it and the
    /// shuffle proof verifies on `public`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `permutation_commitment` or any public input
    ///   is not of size `N`
    /// - challenge source errors
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(size = self.size()))]
    pub fn verify_shuffle(
        &self,
        permutation_proof: &PermutationProof<C>,
        shuffle_proof: &ShuffleProof<C, W>,
        permutation_commitment: &PermutationCommitment<C>,
        public: &ShufflePublicInput<C, W>,
    ) -> Result<bool, Error> {
        let n = self.size();
        check_len(n, permutation_commitment.len())?;
        check_len(n, public.commitment.len())?;
        check_len(n, public.inputs.len())?;
        check_len(n, public.outputs.len())?;

        if permutation_commitment.ser() != public.commitment.ser() {
            tracing::debug!(target: LOG_TARGET, "rejected: proofs refer to different commitments");
            return Ok(false);
        }

        let (permutation_ok, shuffle_ok) = rayon::join(
            || {
                self.permutation_system
                    .verify(permutation_proof, permutation_commitment)
            },
            || self.shuffle_system.verify(shuffle_proof, public),
        );
        let (permutation_ok, shuffle_ok) = (permutation_ok?, shuffle_ok?);

        tracing::debug!(target: LOG_TARGET, permutation_ok, shuffle_ok, "shuffle verified");
        Ok(permutation_ok && shuffle_ok)
    }
}

/// The result of a mix step: shuffled ciphertexts and the proofs that
/// they are a shuffle of the inputs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MixOutput<C: Context, const W: usize> {
    /// The permuted and re-encrypted ciphertexts
    pub outputs: Vec<Ciphertext<C, W>>,
    /// Commitment to the secret permutation
    pub commitment: PermutationCommitment<C>,
    /// Proof that `commitment` commits to a permutation
    pub permutation_proof: PermutationProof<C>,
    /// Proof that `outputs` shuffle the inputs under `commitment`
    pub shuffle_proof: ShuffleProof<C, W>,
}

/**
 * A mix server: shuffles a batch of ciphertexts and proves it did so
 * correctly, with Fiat-Shamir challenges.
 *
 * # Examples
 *
 * ```
 * use mixnet::config::ProofConfig;
 * use mixnet::context::Context;
 * use mixnet::context::RistrettoCtx as RCtx;
 * use mixnet::cryptosystem::elgamal::KeyPair;
 * use mixnet::zkp::verifier::Mixnet;
 *
 * let keypair = KeyPair::<RCtx>::generate();
 * let ciphertexts: Vec<_> = (0..4)
 *     .map(|_| keypair.pkey.encrypt(&[RCtx::random_element()]))
 *     .collect();
 *
 * let config = ProofConfig::new(Default::default(), "mix server 1");
 * let mixnet = Mixnet::<RCtx, 1>::new(keypair.pkey.clone(), 4, config).unwrap();
 * let output = mixnet.mix(&ciphertexts).unwrap();
 *
 * assert!(mixnet.verify(&ciphertexts, &output).unwrap());
 * ```
 */
#[derive(Debug, Clone)]
pub struct Mixnet<C: Context, const W: usize> {
    mixer: ReEncryptionMixer<C, W>,
    scheme: PermutationCommitmentScheme<C>,
    permutation_system: PermutationCommitmentProofSystem<C, FiatShamir<C>>,
    shuffle_system: ReEncryptionShuffleProofSystem<C, FiatShamir<C>, W>,
}

impl<C: Context, const W: usize> Mixnet<C, W> {
    /// Construct a mix server for batches of `size` ciphertexts under `pk`,
    /// with generators derived from [`DEFAULT_GENERATOR_LABEL`].
    ///
    /// # Errors
    ///
    /// See [`with_label`][`Self::with_label`].
    pub fn new(pk: PublicKey<C>, size: usize, config: ProofConfig) -> Result<Self, Error> {
        Self::with_label(pk, size, config, DEFAULT_GENERATOR_LABEL)
    }

    /// Construct a mix server with generators derived from `label`.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if `size` is zero
    /// - `InvalidSecurityParameters` if the configured bit lengths do not fit the group
    /// - `GroupOperation` if the generators cannot be derived
    pub fn with_label(
        pk: PublicKey<C>,
        size: usize,
        config: ProofConfig,
        label: &[u8],
    ) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::EmptyShuffle);
        }
        let scheme = PermutationCommitmentScheme::<C>::new(size, label)?;
        let permutation_system =
            PermutationCommitmentProofSystem::from_scheme(&scheme, FiatShamir::new(config.clone()))?;
        let shuffle_system =
            ReEncryptionShuffleProofSystem::from_scheme(&scheme, pk.clone(), FiatShamir::new(config))?;

        Ok(Self {
            mixer: ReEncryptionMixer::new(pk, size),
            scheme,
            permutation_system,
            shuffle_system,
        })
    }

    /// The batch size `N`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.mixer.size()
    }

    /// The permutation commitment scheme.
    #[must_use]
    pub fn scheme(&self) -> &PermutationCommitmentScheme<C> {
        &self.scheme
    }

    /// Shuffle and prove, using the context rng.
    ///
    /// # Errors
    ///
    /// See [`mix_with`][`Self::mix_with`].
    pub fn mix(&self, ciphertexts: &[Ciphertext<C, W>]) -> Result<MixOutput<C, W>, Error> {
        self.mix_with(ciphertexts, &mut C::get_rng())
    }

    /// Sample a permutation, randomizations and commitment randomizers,
    /// shuffle `ciphertexts`, commit to the permutation and prove both
    /// relations.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if there are not `N` ciphertexts
    #[instrument(target = LOG_TARGET, level = "info", skip_all, fields(size = self.size(), width = W))]
    pub fn mix_with<R: CRng>(
        &self,
        ciphertexts: &[Ciphertext<C, W>],
        rng: &mut R,
    ) -> Result<MixOutput<C, W>, Error> {
        check_len(self.size(), ciphertexts.len())?;

        let permutation = Permutation::random(self.size(), rng);
        let randomizations = self.mixer.generate_randomizations_with(rng);
        let commitment_randomizers = self.scheme.random_randomizers_with(rng);

        let outputs = self
            .mixer
            .shuffle(ciphertexts, &permutation, &randomizations)?;
        let commitment = self.scheme.commit(&permutation, &commitment_randomizers)?;

        let permutation_proof = self.permutation_system.generate_with(
            &permutation,
            &commitment_randomizers,
            &commitment,
            rng,
        )?;

        let private = ShufflePrivateInput::new(permutation, commitment_randomizers, randomizations);
        let public =
            ShufflePublicInput::new(commitment.clone(), ciphertexts.to_vec(), outputs.clone());
        let shuffle_proof = self.shuffle_system.generate_with(&private, &public, rng)?;
        tracing::info!(target: LOG_TARGET, "mix step complete");

        Ok(MixOutput {
            outputs,
            commitment,
            permutation_proof,
            shuffle_proof,
        })
    }

    /// A verifier for the shuffles of this mix server.
    #[must_use]
    pub fn verifier(&self) -> ShuffleVerifier<'_, C, FiatShamir<C>, W> {
        ShuffleVerifier {
            permutation_system: &self.permutation_system,
            shuffle_system: &self.shuffle_system,
        }
    }

    /// Verify that `output` is a correct mix of `inputs`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `inputs` or `output` do not hold `N` elements
    pub fn verify(&self, inputs: &[Ciphertext<C, W>], output: &MixOutput<C, W>) -> Result<bool, Error> {
        let public = ShufflePublicInput::new(
            output.commitment.clone(),
            inputs.to_vec(),
            output.outputs.clone(),
        );

        self.verifier().verify_shuffle(
            &output.permutation_proof,
            &output.shuffle_proof,
            &output.commitment,
            &public,
        )
    }
}
