// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Proof of knowledge of a permutation committed to by a permutation commitment

use crate::commitment::{PermutationCommitment, PermutationCommitmentScheme};
use crate::context::Context;
use crate::permutation::Permutation;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{write_vec, Reader};
use crate::utils::serialization::{FSerializable, VDeserializable, VSerializable};
use crate::zkp::challenge::ChallengeSource;
use crate::zkp::transcript::Transcript;
use crate::zkp::{check_len, inner_product, random_bounded, replayed};

use rayon::prelude::*;
use tracing::instrument;

const LOG_TARGET: &str = "mixnet::zkp::permutation";

const PROTOCOL: &[u8] = b"mixnet_permutation_commitment_proof";

/**
 * Sigma protocol proving that `u = (u_0, .., u_{N-1})` is a commitment to a
 * permutation, with knowledge of the permutation and the randomizers.
 *
 * With e-values `e` and `e'_i = e_{p^-1(i)}`, the prover shows knowledge of
 * openings such that
 *
 * - `prod u_j = g^c prod h_i`: every row of the committed matrix sums to one
 * - `prod u_j^{e_j} = g^a prod h_i^{e'_i}`
 * - `prod e'_i = prod e_j`, through a chain of bridging commitments
 *   `B_i = g^{b_i} B_{i-1}^{e'_i}` starting at `B_{-1} = h_0`
 *
 * which together imply, except with negligible probability over the
 * e-values, that the committed matrix is a permutation matrix.
 *
 * See `EVS`: Protocol 12.3, commitment part.
 */
#[derive(Debug, Clone)]
pub struct PermutationCommitmentProofSystem<C: Context, S: ChallengeSource<C>> {
    generators: Vec<C::Element>,
    source: S,
}

impl<C: Context, S: ChallengeSource<C>> PermutationCommitmentProofSystem<C, S> {
    /// Construct a proof system for commitments under `generators`,
    /// drawing challenges from `source`.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if there are no generators
    /// - `InvalidSecurityParameters` if the source's bit lengths do not fit the group
    pub fn new(generators: Vec<C::Element>, source: S) -> Result<Self, Error> {
        if generators.is_empty() {
            return Err(Error::EmptyShuffle);
        }
        source.security().validate::<C>()?;

        Ok(Self { generators, source })
    }

    /// Construct a proof system for the commitments of `scheme`.
    ///
    /// # Errors
    ///
    /// See [`new`][`Self::new`].
    pub fn from_scheme(scheme: &PermutationCommitmentScheme<C>, source: S) -> Result<Self, Error> {
        Self::new(scheme.generators().to_vec(), source)
    }

    /// The permutation size `N`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.generators.len()
    }

    /// The commitment generators `h_0, .., h_{N-1}`.
    #[must_use]
    pub fn generators(&self) -> &[C::Element] {
        &self.generators
    }

    /// The challenge source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Prove that `commitment` commits to `permutation` with `randomizers`,
    /// using the context rng.
    ///
    /// # Errors
    ///
    /// See [`generate_with`][`Self::generate_with`].
    pub fn generate(
        &self,
        permutation: &Permutation,
        randomizers: &[C::Scalar],
        commitment: &PermutationCommitment<C>,
    ) -> Result<PermutationProof<C>, Error> {
        self.generate_with(permutation, randomizers, commitment, &mut C::get_rng())
    }

    /// Prove that `commitment` commits to `permutation` with `randomizers`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if any input is not of size `N`
    /// - challenge source errors
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(size = self.size()))]
    pub fn generate_with<R: CRng>(
        &self,
        permutation: &Permutation,
        randomizers: &[C::Scalar],
        commitment: &PermutationCommitment<C>,
        rng: &mut R,
    ) -> Result<PermutationProof<C>, Error> {
        let n = self.size();
        check_len(n, permutation.len())?;
        check_len(n, randomizers.len())?;
        check_len(n, commitment.len())?;
        let security = self.source.security();

        let t_e = self.e_transcript(commitment);
        let e_n = self.source.e_values(&t_e, n)?;
        let e_prime_n = permutation.apply_inverse(&e_n)?;
        tracing::trace!(target: LOG_TARGET, stage = "init", "e-values derived");

        let b_n: Vec<C::Scalar> = (0..n).map(|_| C::Scalar::random(rng)).collect();
        let beta_n: Vec<C::Scalar> = (0..n).map(|_| C::Scalar::random(rng)).collect();
        let epsilon_n: Vec<C::Scalar> = (0..n)
            .map(|_| random_bounded::<C, R>(rng, security.mask_bits()))
            .collect();
        let alpha = C::Scalar::random(rng);
        let gamma = C::Scalar::random(rng);
        let delta = C::Scalar::random(rng);

        let big_b_n = self.bridging_commitments(&b_n, &e_prime_n)?;
        let big_b_previous = self.previous_bridges(&big_b_n)?;

        let big_a_prime = C::G::g_exp(&alpha).mul(&C::G::multi_exp(&self.generators, &epsilon_n));
        let big_b_prime_n: Vec<C::Element> = big_b_previous
            .par_iter()
            .zip(beta_n.par_iter())
            .zip(epsilon_n.par_iter())
            .map(|((b_prev, beta), epsilon)| C::G::g_exp(beta).mul(&b_prev.exp(epsilon)))
            .collect();
        let big_c_prime = C::G::g_exp(&gamma);
        let big_d_prime = C::G::g_exp(&delta);

        let commitments = PermutationProofCommitments {
            big_b_n,
            big_a_prime,
            big_b_prime_n,
            big_c_prime,
            big_d_prime,
        };
        tracing::trace!(target: LOG_TARGET, stage = "prover_commit", "first move computed");

        let t_v = Self::v_transcript(t_e, &commitments);
        let v = self.source.sigma(&t_v)?;
        tracing::trace!(target: LOG_TARGET, stage = "challenge_issued", "sigma challenge derived");

        let a = inner_product::<C>(randomizers, &e_n);
        let c = randomizers
            .iter()
            .fold(C::Scalar::zero(), |acc, r| acc.add(r));
        let d = b_n
            .iter()
            .zip(e_prime_n.iter())
            .fold(C::Scalar::zero(), |d_prev, (b, e)| b.add(&e.mul(&d_prev)));

        let k_b_n: Vec<C::Scalar> = b_n
            .par_iter()
            .zip(beta_n.par_iter())
            .map(|(b, beta)| v.mul(b).add(beta))
            .collect();
        let k_e_n: Vec<C::Scalar> = e_prime_n
            .par_iter()
            .zip(epsilon_n.par_iter())
            .map(|(e, epsilon)| v.mul(e).add(epsilon))
            .collect();
        let responses = PermutationProofResponses {
            k_a: v.mul(&a).add(&alpha),
            k_b_n,
            k_c: v.mul(&c).add(&gamma),
            k_d: v.mul(&d).add(&delta),
            k_e_n,
        };
        tracing::trace!(target: LOG_TARGET, stage = "response_computed", "responses computed");

        Ok(PermutationProof {
            commitments,
            challenge: v,
            responses,
        })
    }

    /// Verify that `proof` shows `commitment` to be a permutation commitment.
    ///
    /// Returns `Ok(false)` for proofs that do not verify, including proofs of
    /// the wrong shape.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the commitment is not of size `N`
    /// - challenge source errors
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(size = self.size()))]
    pub fn verify(
        &self,
        proof: &PermutationProof<C>,
        commitment: &PermutationCommitment<C>,
    ) -> Result<bool, Error> {
        let n = self.size();
        check_len(n, commitment.len())?;

        let commitments = &proof.commitments;
        let responses = &proof.responses;
        let lengths = [
            commitments.big_b_n.len(),
            commitments.big_b_prime_n.len(),
            responses.k_b_n.len(),
            responses.k_e_n.len(),
        ];
        if lengths.iter().any(|len| *len != n) {
            tracing::debug!(target: LOG_TARGET, ?lengths, "rejected: malformed proof");
            return Ok(false);
        }

        let t_e = self.e_transcript(commitment);
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

        let u_n = commitment.elements();
        let h_0 = self.first_generator()?;

        // A = prod u_j^e_j
        let big_a = C::G::multi_exp(u_n, &e_n);
        // C = prod u_j / prod h_i
        let big_c = product::<C>(u_n).mul(&product::<C>(&self.generators).inv());
        // D = B_{N-1} / h_0^(prod e_j)
        let prod_e = e_n.iter().fold(C::Scalar::one(), |acc, e| acc.mul(e));
        let big_b_last = commitments.big_b_n.last().ok_or(Error::EmptyShuffle)?;
        let big_d = big_b_last.mul(&h_0.exp(&prod_e).inv());

        let check_a = big_a.exp(&v).mul(&commitments.big_a_prime)
            == C::G::g_exp(&responses.k_a)
                .mul(&C::G::multi_exp(&self.generators, &responses.k_e_n));

        let big_b_previous = self.previous_bridges(&commitments.big_b_n)?;
        let check_b = big_b_previous
            .par_iter()
            .zip(commitments.big_b_n.par_iter())
            .zip(commitments.big_b_prime_n.par_iter())
            .zip(responses.k_b_n.par_iter().zip(responses.k_e_n.par_iter()))
            .all(|(((b_prev, b), b_prime), (k_b, k_e))| {
                b.exp(&v).mul(b_prime) == C::G::g_exp(k_b).mul(&b_prev.exp(k_e))
            });

        let check_c = big_c.exp(&v).mul(&commitments.big_c_prime) == C::G::g_exp(&responses.k_c);
        let check_d = big_d.exp(&v).mul(&commitments.big_d_prime) == C::G::g_exp(&responses.k_d);

        let ok = check_a && check_b && check_c && check_d;
        if ok {
            tracing::debug!(target: LOG_TARGET, stage = "verified", "permutation proof accepted");
        } else {
            tracing::debug!(
                target: LOG_TARGET,
                stage = "rejected",
                check_a,
                check_b,
                check_c,
                check_d,
                "permutation proof rejected"
            );
        }

        Ok(ok)
    }

    fn first_generator(&self) -> Result<&C::Element, Error> {
        self.generators.first().ok_or(Error::EmptyShuffle)
    }

    /// `B_i = g^{b_i} B_{i-1}^{e'_i}` with `B_{-1} = h_0`; inherently sequential.
    fn bridging_commitments(
        &self,
        b_n: &[C::Scalar],
        e_prime_n: &[C::Scalar],
    ) -> Result<Vec<C::Element>, Error> {
        let g_b_n: Vec<C::Element> = b_n.par_iter().map(C::G::g_exp).collect();

        let mut previous = self.first_generator()?.clone();
        let mut ret = Vec::with_capacity(b_n.len());
        for (g_b, e_prime) in g_b_n.iter().zip(e_prime_n.iter()) {
            let big_b = g_b.mul(&previous.exp(e_prime));
            ret.push(big_b.clone());
            previous = big_b;
        }

        Ok(ret)
    }

    /// `B_{-1}, B_0, .., B_{N-2}`, with `B_{-1} = h_0`.
    fn previous_bridges<'a>(
        &'a self,
        big_b_n: &'a [C::Element],
    ) -> Result<Vec<&'a C::Element>, Error> {
        let h_0 = self.first_generator()?;
        let except_last = big_b_n.len().saturating_sub(1);

        Ok(std::iter::once(h_0)
            .chain(big_b_n.iter().take(except_last))
            .collect())
    }

    fn e_transcript(&self, commitment: &PermutationCommitment<C>) -> Transcript {
        Transcript::new(PROTOCOL)
            .with(b"size", (self.size() as u64).to_be_bytes().to_vec())
            .with(b"generator", C::generator().ser_f())
            .with(b"h_n", self.generators.ser())
            .with(b"u_n", commitment.ser())
    }

    fn v_transcript(t_e: Transcript, commitments: &PermutationProofCommitments<C>) -> Transcript {
        t_e.with(b"big_b_n", commitments.big_b_n.ser())
            .with(b"big_a_prime", commitments.big_a_prime.ser_f())
            .with(b"big_b_prime_n", commitments.big_b_prime_n.ser())
            .with(b"big_c_prime", commitments.big_c_prime.ser_f())
            .with(b"big_d_prime", commitments.big_d_prime.ser_f())
    }
}

/// `prod elements_i`
fn product<C: Context>(elements: &[C::Element]) -> C::Element {
    elements
        .par_iter()
        .cloned()
        .reduce(C::Element::one, |a, b| a.mul(&b))
}

/**
 * Proof that a vector of elements is a permutation commitment.
 *
 * Contains the bridging commitments and the Sigma protocol transcript
 * `(commitments, challenge, responses)`.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationProof<C: Context> {
    /// First move, including the bridging commitments.
    pub commitments: PermutationProofCommitments<C>,
    /// The Sigma challenge `v`.
    pub challenge: C::Scalar,
    /// Responses to the challenge.
    pub responses: PermutationProofResponses<C>,
}

/// Bridging commitments and first move of a [`PermutationProof`].
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationProofCommitments<C: Context> {
    /// Bridging commitments `B_0, .., B_{N-1}`
    pub big_b_n: Vec<C::Element>,
    /// `A' = g^alpha prod h_i^epsilon_i`
    pub big_a_prime: C::Element,
    /// `B'_i = g^beta_i B_{i-1}^epsilon_i`
    pub big_b_prime_n: Vec<C::Element>,
    /// `C' = g^gamma`
    pub big_c_prime: C::Element,
    /// `D' = g^delta`
    pub big_d_prime: C::Element,
}

/// Responses of a [`PermutationProof`].
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationProofResponses<C: Context> {
    /// `k_A = v a + alpha`
    pub k_a: C::Scalar,
    /// `k_B_i = v b_i + beta_i`
    pub k_b_n: Vec<C::Scalar>,
    /// `k_C = v c + gamma`
    pub k_c: C::Scalar,
    /// `k_D = v d + delta`
    pub k_d: C::Scalar,
    /// `k_E_i = v e'_i + epsilon_i`
    pub k_e_n: Vec<C::Scalar>,
}

impl<C: Context> VSerializable for PermutationProof<C> {
    fn ser(&self) -> Vec<u8> {
        let commitments = &self.commitments;
        let responses = &self.responses;
        let mut buffer = vec![];

        write_vec(&mut buffer, &commitments.big_b_n);
        commitments.big_a_prime.ser_into(&mut buffer);
        write_vec(&mut buffer, &commitments.big_b_prime_n);
        commitments.big_c_prime.ser_into(&mut buffer);
        commitments.big_d_prime.ser_into(&mut buffer);
        self.challenge.ser_into(&mut buffer);
        responses.k_a.ser_into(&mut buffer);
        write_vec(&mut buffer, &responses.k_b_n);
        responses.k_c.ser_into(&mut buffer);
        responses.k_d.ser_into(&mut buffer);
        write_vec(&mut buffer, &responses.k_e_n);

        buffer
    }
}

impl<C: Context> VDeserializable for PermutationProof<C> {
    fn deser(buffer: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(buffer);

        let commitments = PermutationProofCommitments {
            big_b_n: reader.read_vec()?,
            big_a_prime: reader.read()?,
            big_b_prime_n: reader.read_vec()?,
            big_c_prime: reader.read()?,
            big_d_prime: reader.read()?,
        };
        let challenge = reader.read()?;
        let responses = PermutationProofResponses {
            k_a: reader.read()?,
            k_b_n: reader.read_vec()?,
            k_c: reader.read()?,
            k_d: reader.read()?,
            k_e_n: reader.read_vec()?,
        };
        reader.finish()?;

        Ok(Self {
            commitments,
            challenge,
            responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::DEFAULT_GENERATOR_LABEL;
    use crate::config::{ProofConfig, SecurityParameters};
    use crate::context::P256Ctx as PCtx;
    use crate::context::RistrettoCtx as RCtx;
    use crate::utils::rng;
    use crate::zkp::challenge::FiatShamir;

    type System<C> = PermutationCommitmentProofSystem<C, FiatShamir<C>>;

    struct Setup<C: Context> {
        scheme: PermutationCommitmentScheme<C>,
        system: System<C>,
        permutation: Permutation,
        randomizers: Vec<C::Scalar>,
        commitment: PermutationCommitment<C>,
    }

    fn setup<C: Context>(size: usize) -> Setup<C> {
        let scheme = PermutationCommitmentScheme::<C>::new(size, DEFAULT_GENERATOR_LABEL).unwrap();
        let config = ProofConfig::new(SecurityParameters::default(), "prover");
        let system = System::<C>::from_scheme(&scheme, FiatShamir::new(config)).unwrap();
        let permutation = Permutation::generate::<C>(size);
        let randomizers = scheme.random_randomizers();
        let commitment = scheme.commit(&permutation, &randomizers).unwrap();

        Setup {
            scheme,
            system,
            permutation,
            randomizers,
            commitment,
        }
    }

    #[test]
    fn test_permutation_proof_ristretto() {
        test_permutation_proof::<RCtx>(1);
        test_permutation_proof::<RCtx>(2);
        test_permutation_proof::<RCtx>(10);
    }

    #[test]
    fn test_permutation_proof_p256() {
        test_permutation_proof::<PCtx>(1);
        test_permutation_proof::<PCtx>(10);
    }

    #[test]
    fn test_permutation_proof_invalid_ristretto() {
        test_permutation_proof_invalid::<RCtx>();
        test_not_a_permutation::<RCtx>();
    }

    #[test]
    fn test_permutation_proof_invalid_p256() {
        test_permutation_proof_invalid::<PCtx>();
        test_not_a_permutation::<PCtx>();
    }

    #[test]
    fn test_permutation_proof_serialization_ristretto() {
        test_permutation_proof_serialization::<RCtx>();
    }

    #[test]
    fn test_permutation_proof_serialization_p256() {
        test_permutation_proof_serialization::<PCtx>();
    }

    #[test]
    fn test_permutation_proof_rejects_compact_p256_points() {
        let s = setup::<PCtx>(3);
        let proof = s
            .system
            .generate(&s.permutation, &s.randomizers, &s.commitment)
            .unwrap();
        let mut bytes = proof.ser();

        // B_0 follows the u32 length prefix
        assert!(bytes[4] == 0x02 || bytes[4] == 0x03);
        bytes[4] = 0x05;
        assert!(matches!(
            PermutationProof::<PCtx>::deser(&bytes),
            Err(Error::DeserializationError(_))
        ));
    }

    fn test_permutation_proof<C: Context>(size: usize) {
        let s = setup::<C>(size);
        let proof = s
            .system
            .generate(&s.permutation, &s.randomizers, &s.commitment)
            .unwrap();

        assert!(s.system.verify(&proof, &s.commitment).unwrap());

        // fresh randomness every time
        let again = s
            .system
            .generate(&s.permutation, &s.randomizers, &s.commitment)
            .unwrap();
        assert!(s.system.verify(&again, &s.commitment).unwrap());
        assert_ne!(proof, again);
    }

    fn test_permutation_proof_invalid<C: Context>() {
        let size = 6;
        let s = setup::<C>(size);
        let proof = s
            .system
            .generate(&s.permutation, &s.randomizers, &s.commitment)
            .unwrap();

        // a different commitment
        let other = s
            .scheme
            .commit(&s.permutation, &s.scheme.random_randomizers())
            .unwrap();
        assert!(!s.system.verify(&proof, &other).unwrap());

        // tampered responses
        let mut tampered = proof.clone();
        tampered.responses.k_a = tampered.responses.k_a.add(&C::Scalar::one());
        assert!(!s.system.verify(&tampered, &s.commitment).unwrap());

        let mut tampered = proof.clone();
        tampered.responses.k_e_n.swap(0, 1);
        assert!(!s.system.verify(&tampered, &s.commitment).unwrap());

        // tampered challenge
        let mut tampered = proof.clone();
        tampered.challenge = tampered.challenge.add(&C::Scalar::one());
        assert!(!s.system.verify(&tampered, &s.commitment).unwrap());

        // tampered bridging commitment
        let mut tampered = proof.clone();
        tampered.commitments.big_b_n[2] = C::random_element();
        assert!(!s.system.verify(&tampered, &s.commitment).unwrap());

        // malformed shape is a rejection, not an error
        let mut tampered = proof.clone();
        tampered.responses.k_b_n.pop();
        assert_eq!(s.system.verify(&tampered, &s.commitment), Ok(false));

        // commitment of the wrong size is an error
        let short = PermutationCommitment(s.commitment.elements()[1..].to_vec());
        assert!(matches!(
            s.system.verify(&proof, &short),
            Err(Error::DimensionMismatch { .. })
        ));

        // a different prover identifier derives different challenges
        let config = ProofConfig::new(SecurityParameters::default(), "someone else");
        let other_system = System::<C>::from_scheme(&s.scheme, FiatShamir::new(config)).unwrap();
        assert!(!other_system.verify(&proof, &s.commitment).unwrap());

        assert!(matches!(
            s.system
                .generate(&Permutation::identity(size + 1), &s.randomizers, &s.commitment),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    fn test_not_a_permutation<C: Context>() {
        let size = 5;
        let s = setup::<C>(size);

        // column 0 and column 1 both commit to h_{p[0]}
        let mut forged = s.commitment.elements().to_vec();
        let h = &s.scheme.generators()[s.permutation.get(0).unwrap()];
        forged[1] = C::G::g_exp(&s.randomizers[1]).mul(h);
        let forged = PermutationCommitment(forged);

        let proof = s
            .system
            .generate(&s.permutation, &s.randomizers, &forged)
            .unwrap();
        assert!(!s.system.verify(&proof, &forged).unwrap());
    }

    fn test_permutation_proof_serialization<C: Context>() {
        let s = setup::<C>(7);
        let mut rng = rng::seeded_from_u64(17);
        let proof = s
            .system
            .generate_with(&s.permutation, &s.randomizers, &s.commitment, &mut rng)
            .unwrap();

        let bytes = proof.ser();
        let back = PermutationProof::<C>::deser(&bytes).unwrap();
        assert_eq!(back, proof);
        assert!(s.system.verify(&back, &s.commitment).unwrap());
        assert!(PermutationProof::<C>::deser(&bytes[1..]).is_err());

        // seeded runs are reproducible
        let mut rng = rng::seeded_from_u64(17);
        let replay = s
            .system
            .generate_with(&s.permutation, &s.randomizers, &s.commitment, &mut rng)
            .unwrap();
        assert_eq!(replay.ser(), bytes);
    }
}
