// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Proof that a batch of ciphertexts was permuted and re-encrypted according
//! to a committed permutation

use crate::commitment::{PermutationCommitment, PermutationCommitmentScheme};
use crate::context::Context;
use crate::cryptosystem::elgamal::{Ciphertext, PublicKey};
use crate::permutation::Permutation;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::traits::groups::{DistScalarOps, ReplScalarOps};
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{write_vec, Reader};
use crate::utils::serialization::{FSerializable, VDeserializable, VSerializable};
use crate::zkp::challenge::ChallengeSource;
use crate::zkp::transcript::Transcript;
use crate::zkp::{check_len, ciphertext_multi_exp, inner_product, random_bounded, replayed};

use rayon::prelude::*;
use tracing::instrument;

const LOG_TARGET: &str = "mixnet::zkp::shuffle";

const PROTOCOL: &[u8] = b"mixnet_re_encryption_shuffle_proof";

/**
 * Witness of a re-encryption shuffle.
 *
 * The outputs satisfy `w'_j = ReEncrypt(w_{p[j]}, s_j)` and the commitment
 * satisfies `u_j = g^{r_j} h_{p[j]}`.
 */
#[derive(Debug, Clone)]
pub struct ShufflePrivateInput<C: Context, const W: usize> {
    /// The permutation `p`
    pub permutation: Permutation,
    /// The commitment randomizers `r_j`
    pub commitment_randomizers: Vec<C::Scalar>,
    /// The re-encryption randomizations `s_j`
    pub randomizations: Vec<[C::Scalar; W]>,
}

impl<C: Context, const W: usize> ShufflePrivateInput<C, W> {
    /// Bundle the witness of a shuffle.
    pub fn new(
        permutation: Permutation,
        commitment_randomizers: Vec<C::Scalar>,
        randomizations: Vec<[C::Scalar; W]>,
    ) -> Self {
        Self {
            permutation,
            commitment_randomizers,
            randomizations,
        }
    }
}

/// Statement of a re-encryption shuffle.
#[derive(Debug, Clone, PartialEq)]
pub struct ShufflePublicInput<C: Context, const W: usize> {
    /// The permutation commitment `u`
    pub commitment: PermutationCommitment<C>,
    /// The input ciphertexts `w`
    pub inputs: Vec<Ciphertext<C, W>>,
    /// The output ciphertexts `w'`
    pub outputs: Vec<Ciphertext<C, W>>,
}

impl<C: Context, const W: usize> ShufflePublicInput<C, W> {
    /// Bundle the statement of a shuffle.
    pub fn new(
        commitment: PermutationCommitment<C>,
        inputs: Vec<Ciphertext<C, W>>,
        outputs: Vec<Ciphertext<C, W>>,
    ) -> Self {
        Self {
            commitment,
            inputs,
            outputs,
        }
    }
}

/**
 * Sigma protocol proving that `w'` is a re-encryption shuffle of `w` under
 * the permutation committed in `u`.
 *
 * With e-values `e` and `e'_i = e_{p^-1(i)}`, the prover shows knowledge of
 * `a`, `f` and `e'` such that
 *
 * - `prod u_j^{e_j} = g^a prod h_i^{e'_i}`
 * - `prod w'_j^{e_j} = Enc(1, f) prod w_i^{e'_i}`
 *
 * The first relation ties `e'` to the committed permutation, the second
 * shows the outputs are the permuted inputs up to re-encryption.
 * Soundness depends on `u` being a permutation commitment, which is shown
 * separately by [`PermutationCommitmentProofSystem`][`crate::zkp::permutation::PermutationCommitmentProofSystem`].
 *
 * See `EVS`: Protocol 12.3, shuffle part.
 */
#[derive(Debug, Clone)]
pub struct ReEncryptionShuffleProofSystem<C: Context, S: ChallengeSource<C>, const W: usize> {
    generators: Vec<C::Element>,
    pk: PublicKey<C>,
    source: S,
}

impl<C: Context, S: ChallengeSource<C>, const W: usize> ReEncryptionShuffleProofSystem<C, S, W> {
    /// Construct a proof system for shuffles under `pk`, with permutation
    /// commitments under `generators`.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if there are no generators
    /// - `InvalidSecurityParameters` if the source's bit lengths do not fit the group
    pub fn new(generators: Vec<C::Element>, pk: PublicKey<C>, source: S) -> Result<Self, Error> {
        if generators.is_empty() {
            return Err(Error::EmptyShuffle);
        }
        source.security().validate::<C>()?;

        Ok(Self {
            generators,
            pk,
            source,
        })
    }

    /// Construct a proof system for shuffles committed with `scheme`.
    ///
    /// # Errors
    ///
    /// See [`new`][`Self::new`].
    pub fn from_scheme(
        scheme: &PermutationCommitmentScheme<C>,
        pk: PublicKey<C>,
        source: S,
    ) -> Result<Self, Error> {
        Self::new(scheme.generators().to_vec(), pk, source)
    }

    /// The batch size `N`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.generators.len()
    }

    /// The commitment generators `h_0, .., h_{N-1}`.
    #[must_use]
    pub fn generators(&self) -> &[C::Element] {
        &self.generators
    }

    /// The public key ciphertexts are re-encrypted under.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey<C> {
        &self.pk
    }

    /// The challenge source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Prove the shuffle, using the context rng.
    ///
    /// # Errors
    ///
    /// See [`generate_with`][`Self::generate_with`].
    pub fn generate(
        &self,
        private: &ShufflePrivateInput<C, W>,
        public: &ShufflePublicInput<C, W>,
    ) -> Result<ShuffleProof<C, W>, Error> {
        self.generate_with(private, public, &mut C::get_rng())
    }

    /// Prove the shuffle.
    ///
    /// The witness is not checked against the statement; an inconsistent
    /// witness yields a proof that does not verify.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if any input is not of size `N`
    /// - challenge source errors
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(size = self.size(), width = W))]
    pub fn generate_with<R: CRng>(
        &self,
        private: &ShufflePrivateInput<C, W>,
        public: &ShufflePublicInput<C, W>,
        rng: &mut R,
    ) -> Result<ShuffleProof<C, W>, Error> {
        let n = self.size();
        check_len(n, private.permutation.len())?;
        check_len(n, private.commitment_randomizers.len())?;
        check_len(n, private.randomizations.len())?;
        self.check_public(public)?;
        let security = self.source.security();

        let t_e = self.e_transcript(public);
        let e_n = self.source.e_values(&t_e, n)?;
        let e_prime_n = private.permutation.apply_inverse(&e_n)?;
        tracing::trace!(target: LOG_TARGET, stage = "init", "e-values derived");

        let alpha = C::Scalar::random(rng);
        let epsilon_n: Vec<C::Scalar> = (0..n)
            .map(|_| random_bounded::<C, R>(rng, security.mask_bits()))
            .collect();
        let phi = <[C::Scalar; W]>::random(rng);

        let big_a_prime = C::G::g_exp(&alpha).mul(&C::G::multi_exp(&self.generators, &epsilon_n));
        let big_f_prime = self
            .pk
            .encrypt_one(&phi)
            .mul(&ciphertext_multi_exp(&public.inputs, &epsilon_n));
        let commitments = ShuffleProofCommitments {
            big_a_prime,
            big_f_prime,
        };
        tracing::trace!(target: LOG_TARGET, stage = "prover_commit", "first move computed");

        let t_v = Self::v_transcript(t_e, &commitments);
        let v = self.source.sigma(&t_v)?;
        tracing::trace!(target: LOG_TARGET, stage = "challenge_issued", "sigma challenge derived");

        let a = inner_product::<C>(&private.commitment_randomizers, &e_n);
        let f = private
            .randomizations
            .par_iter()
            .zip(e_n.par_iter())
            .map(|(s, e)| s.dist_mul(e))
            .reduce(<[C::Scalar; W]>::zero, |x, y| x.add(&y));

        let k_e_n: Vec<C::Scalar> = e_prime_n
            .par_iter()
            .zip(epsilon_n.par_iter())
            .map(|(e, epsilon)| v.mul(e).add(epsilon))
            .collect();
        let responses = ShuffleProofResponses {
            k_a: v.mul(&a).add(&alpha),
            k_e_n,
            k_f: v.repl_mul(&f).add(&phi),
        };
        tracing::trace!(target: LOG_TARGET, stage = "response_computed", "responses computed");

        Ok(ShuffleProof {
            commitments,
            challenge: v,
            responses,
        })
    }

    /// Verify that `proof` shows the outputs of `public` to be a
    /// re-encryption shuffle of its inputs.
    ///
    /// Returns `Ok(false)` for proofs that do not verify, including proofs of
    /// the wrong shape.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if any public input is not of size `N`
    /// - challenge source errors
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(size = self.size(), width = W))]
    pub fn verify(
        &self,
        proof: &ShuffleProof<C, W>,
        public: &ShufflePublicInput<C, W>,
    ) -> Result<bool, Error> {
        let n = self.size();
        self.check_public(public)?;

        let commitments = &proof.commitments;
        let responses = &proof.responses;
        if responses.k_e_n.len() != n {
            tracing::debug!(
                target: LOG_TARGET,
                found = responses.k_e_n.len(),
                "rejected: malformed proof"
            );
            return Ok(false);
        }

        let t_e = self.e_transcript(public);
        let Some(e_n) = replayed(self.source.e_values(&t_e, n))? else {
            tracing::debug!(target: LOG_TARGET, "rejected: no e-values for transcript");
            return Ok(false);
        };
        let t_v = Self::v_transcript(t_e, commitments);
        let Some(v) = replayed(self.source.sigma(&t_v))? else {
            tracing::debug!(target: LOG_TARGET, "rejected: no challenge for transcript");
            return Ok(false);
        };
        if v != proof.challenge {
            tracing::debug!(target: LOG_TARGET, "rejected: challenge mismatch");
            return Ok(false);
        }

        // A = prod u_j^e_j, F = prod w'_j^e_j
        let (check_a, check_f) = rayon::join(
            || {
                let big_a = C::G::multi_exp(public.commitment.elements(), &e_n);
                big_a.exp(&v).mul(&commitments.big_a_prime)
                    == C::G::g_exp(&responses.k_a)
                        .mul(&C::G::multi_exp(&self.generators, &responses.k_e_n))
            },
            || {
                let big_f = ciphertext_multi_exp(&public.outputs, &e_n);
                big_f.exp(&v).mul(&commitments.big_f_prime)
                    == self
                        .pk
                        .encrypt_one(&responses.k_f)
                        .mul(&ciphertext_multi_exp(&public.inputs, &responses.k_e_n))
            },
        );

        let ok = check_a && check_f;
        if ok {
            tracing::debug!(target: LOG_TARGET, stage = "verified", "shuffle proof accepted");
        } else {
            tracing::debug!(
                target: LOG_TARGET,
                stage = "rejected",
                check_a,
                check_f,
                "shuffle proof rejected"
            );
        }

        Ok(ok)
    }

    fn check_public(&self, public: &ShufflePublicInput<C, W>) -> Result<(), Error> {
        let n = self.size();
        check_len(n, public.commitment.len())?;
        check_len(n, public.inputs.len())?;
        check_len(n, public.outputs.len())
    }

    fn e_transcript(&self, public: &ShufflePublicInput<C, W>) -> Transcript {
        Transcript::new(PROTOCOL)
            .with(b"size", (self.size() as u64).to_be_bytes().to_vec())
            .with(b"width", (W as u64).to_be_bytes().to_vec())
            .with(b"generator", C::generator().ser_f())
            .with(b"h_n", self.generators.ser())
            .with(b"public_key", self.pk.ser_f())
            .with(b"u_n", public.commitment.ser())
            .with(b"w_n", public.inputs.ser())
            .with(b"w_prime_n", public.outputs.ser())
    }

    fn v_transcript(t_e: Transcript, commitments: &ShuffleProofCommitments<C, W>) -> Transcript {
        t_e.with(b"big_a_prime", commitments.big_a_prime.ser_f())
            .with(b"big_f_prime", commitments.big_f_prime.ser_f())
    }
}

/// Proof of a re-encryption shuffle: `(commitments, challenge, responses)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShuffleProof<C: Context, const W: usize> {
    /// First move.
    pub commitments: ShuffleProofCommitments<C, W>,
    /// The Sigma challenge `v`.
    pub challenge: C::Scalar,
    /// Responses to the challenge.
    pub responses: ShuffleProofResponses<C, W>,
}

/// First move of a [`ShuffleProof`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShuffleProofCommitments<C: Context, const W: usize> {
    /// `A' = g^alpha prod h_i^epsilon_i`
    pub big_a_prime: C::Element,
    /// `F' = Enc(1, phi) prod w_i^epsilon_i`
    pub big_f_prime: Ciphertext<C, W>,
}

/// Responses of a [`ShuffleProof`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShuffleProofResponses<C: Context, const W: usize> {
    /// `k_A = v a + alpha`
    pub k_a: C::Scalar,
    /// `k_E_i = v e'_i + epsilon_i`
    pub k_e_n: Vec<C::Scalar>,
    /// `k_F = v f + phi`
    pub k_f: [C::Scalar; W],
}

impl<C: Context, const W: usize> VSerializable for ShuffleProof<C, W> {
    fn ser(&self) -> Vec<u8> {
        let mut buffer = vec![];

        self.commitments.big_a_prime.ser_into(&mut buffer);
        self.commitments.big_f_prime.ser_into(&mut buffer);
        self.challenge.ser_into(&mut buffer);
        self.responses.k_a.ser_into(&mut buffer);
        write_vec(&mut buffer, &self.responses.k_e_n);
        self.responses.k_f.ser_into(&mut buffer);

        buffer
    }
}

impl<C: Context, const W: usize> VDeserializable for ShuffleProof<C, W> {
    fn deser(buffer: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(buffer);

        let commitments = ShuffleProofCommitments {
            big_a_prime: reader.read()?,
            big_f_prime: reader.read()?,
        };
        let challenge = reader.read()?;
        let responses = ShuffleProofResponses {
            k_a: reader.read()?,
            k_e_n: reader.read_vec()?,
            k_f: reader.read()?,
        };
        reader.finish()?;

        Ok(Self {
            commitments,
            challenge,
            responses,
        })
    }
}
