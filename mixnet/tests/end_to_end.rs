// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Complete shuffles through the public API: mix, prove, verify, tamper.

use std::array;

use mixnet::commitment::{PermutationCommitment, PermutationCommitmentScheme, DEFAULT_GENERATOR_LABEL};
use mixnet::config::{ProofConfig, SecurityParameters};
use mixnet::context::Context;
use mixnet::context::P256Ctx as PCtx;
use mixnet::context::RistrettoCtx as RCtx;
use mixnet::cryptosystem::elgamal::{Ciphertext, KeyPair};
use mixnet::mixer::ReEncryptionMixer;
use mixnet::permutation::Permutation;
use mixnet::traits::groups::GroupScalar;
use mixnet::utils::rng;
use mixnet::zkp::challenge::{self, FiatShamir};
use mixnet::zkp::permutation::{PermutationCommitmentProofSystem, PermutationProof};
use mixnet::zkp::shuffle::{ReEncryptionShuffleProofSystem, ShuffleProof};
use mixnet::zkp::shuffle::{ShufflePrivateInput, ShufflePublicInput};
use mixnet::zkp::verifier::{Mixnet, ShuffleVerifier};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Shuffled<C: Context, const W: usize> {
    keypair: KeyPair<C>,
    messages: Vec<[C::Element; W]>,
    scheme: PermutationCommitmentScheme<C>,
    private: ShufflePrivateInput<C, W>,
    public: ShufflePublicInput<C, W>,
}

/// Encrypts `size` random messages and shuffles them with `permutation`,
/// drawing every random value from a seeded rng.
fn shuffled<C: Context, const W: usize>(permutation: Permutation, seed: u64) -> Shuffled<C, W> {
    let size = permutation.len();
    let mut rng = rng::seeded_from_u64(seed);

    let keypair = KeyPair::<C>::generate_with(&mut rng);
    let messages: Vec<[C::Element; W]> = (0..size)
        .map(|_| array::from_fn(|_| C::random_element()))
        .collect();
    let inputs: Vec<Ciphertext<C, W>> = messages
        .iter()
        .map(|m| keypair.pkey.encrypt_with_r(m, &<[C::Scalar; W]>::random(&mut rng)))
        .collect();

    let mixer = ReEncryptionMixer::<C, W>::new(keypair.pkey.clone(), size);
    let randomizations = mixer.generate_randomizations_with(&mut rng);
    let outputs = mixer.shuffle(&inputs, &permutation, &randomizations).unwrap();

    let scheme = PermutationCommitmentScheme::<C>::new(size, DEFAULT_GENERATOR_LABEL).unwrap();
    let randomizers = scheme.random_randomizers_with(&mut rng);
    let commitment = scheme.commit(&permutation, &randomizers).unwrap();

    Shuffled {
        keypair,
        messages,
        scheme,
        private: ShufflePrivateInput::new(permutation, randomizers, randomizations),
        public: ShufflePublicInput::new(commitment, inputs, outputs),
    }
}

struct Systems<C: Context, const W: usize> {
    permutation: PermutationCommitmentProofSystem<C, FiatShamir<C>>,
    shuffle: ReEncryptionShuffleProofSystem<C, FiatShamir<C>, W>,
}

fn systems<C: Context, const W: usize>(s: &Shuffled<C, W>, config: &ProofConfig) -> Systems<C, W> {
    Systems {
        permutation: PermutationCommitmentProofSystem::from_scheme(
            &s.scheme,
            FiatShamir::new(config.clone()),
        )
        .unwrap(),
        shuffle: ReEncryptionShuffleProofSystem::from_scheme(
            &s.scheme,
            s.keypair.pkey.clone(),
            FiatShamir::new(config.clone()),
        )
        .unwrap(),
    }
}

fn prove<C: Context, const W: usize>(
    s: &Shuffled<C, W>,
    systems: &Systems<C, W>,
) -> (PermutationProof<C>, ShuffleProof<C, W>) {
    let permutation_proof = systems
        .permutation
        .generate(
            &s.private.permutation,
            &s.private.commitment_randomizers,
            &s.public.commitment,
        )
        .unwrap();
    let shuffle_proof = systems.shuffle.generate(&s.private, &s.public).unwrap();

    (permutation_proof, shuffle_proof)
}

#[test]
fn test_fixed_permutation_of_four() {
    init_tracing();
    fixed_permutation_of_four::<RCtx, 1>();
    fixed_permutation_of_four::<PCtx, 2>();
}

fn fixed_permutation_of_four<C: Context, const W: usize>() {
    let permutation = Permutation::new(vec![2, 0, 3, 1]).unwrap();
    let s = shuffled::<C, W>(permutation, 2025);
    let config = ProofConfig::new(SecurityParameters::default(), "example");
    let systems = systems(&s, &config);

    // w'_j decrypts to m_{p[j]}
    let decrypted: Vec<[C::Element; W]> =
        s.public.outputs.iter().map(|c| s.keypair.decrypt(c)).collect();
    assert_eq!(decrypted, s.private.permutation.apply(&s.messages).unwrap());

    let (permutation_proof, shuffle_proof) = prove(&s, &systems);
    let verifier = ShuffleVerifier::new(&systems.permutation, &systems.shuffle).unwrap();
    assert!(verifier
        .verify_shuffle(&permutation_proof, &shuffle_proof, &s.public.commitment, &s.public)
        .unwrap());

    let mut swapped = s.public.clone();
    swapped.outputs.swap(1, 2);
    assert!(!verifier
        .verify_shuffle(&permutation_proof, &shuffle_proof, &s.public.commitment, &swapped)
        .unwrap());
}

#[test]
fn test_sizes_ristretto() {
    init_tracing();
    for size in [1, 2, 10, 100, 300] {
        mix_and_verify::<RCtx, 1>(size);
    }
    mix_and_verify::<RCtx, 3>(17);
}

#[test]
fn test_sizes_p256() {
    init_tracing();
    for size in [1, 2, 10, 100] {
        mix_and_verify::<PCtx, 1>(size);
    }
}

fn mix_and_verify<C: Context, const W: usize>(size: usize) {
    let keypair = KeyPair::<C>::generate();
    let inputs: Vec<Ciphertext<C, W>> = (0..size)
        .map(|_| keypair.pkey.encrypt(&array::from_fn(|_| C::random_element())))
        .collect();

    let config = ProofConfig::new(SecurityParameters::new(60, 60, 20), "mix server");
    let mixnet = Mixnet::<C, W>::new(keypair.pkey.clone(), size, config).unwrap();
    let output = mixnet.mix(&inputs).unwrap();

    assert_eq!(output.outputs.len(), size);
    assert!(mixnet.verify(&inputs, &output).unwrap(), "size {size}");
}

#[test]
fn test_tamper_every_field() {
    init_tracing();
    tamper_every_field::<RCtx, 2>();
    tamper_every_field::<PCtx, 1>();
}

/// Replaces each value of both proofs in turn and checks the shuffle is rejected.
fn tamper_every_field<C: Context, const W: usize>() {
    let size = 3;
    let s = shuffled::<C, W>(Permutation::new(vec![1, 2, 0]).unwrap(), 7);
    let systems = systems(&s, &ProofConfig::default());
    let verifier = ShuffleVerifier::new(&systems.permutation, &systems.shuffle).unwrap();
    let (permutation_proof, shuffle_proof) = prove(&s, &systems);

    let check = |p: &PermutationProof<C>, sp: &ShuffleProof<C, W>| {
        verifier
            .verify_shuffle(p, sp, &s.public.commitment, &s.public)
            .unwrap()
    };
    assert!(check(&permutation_proof, &shuffle_proof));

    let scalar = |x: &C::Scalar| x.add(&C::Scalar::one());

    let mut mutants: Vec<PermutationProof<C>> = vec![];
    for i in 0..size {
        let mut p = permutation_proof.clone();
        p.commitments.big_b_n[i] = C::random_element();
        mutants.push(p);

        let mut p = permutation_proof.clone();
        p.commitments.big_b_prime_n[i] = C::random_element();
        mutants.push(p);

        let mut p = permutation_proof.clone();
        p.responses.k_b_n[i] = scalar(&p.responses.k_b_n[i]);
        mutants.push(p);

        let mut p = permutation_proof.clone();
        p.responses.k_e_n[i] = scalar(&p.responses.k_e_n[i]);
        mutants.push(p);
    }
    let mut p = permutation_proof.clone();
    p.commitments.big_a_prime = C::random_element();
    mutants.push(p);
    let mut p = permutation_proof.clone();
    p.commitments.big_c_prime = C::random_element();
    mutants.push(p);
    let mut p = permutation_proof.clone();
    p.commitments.big_d_prime = C::random_element();
    mutants.push(p);
    let mut p = permutation_proof.clone();
    p.challenge = scalar(&p.challenge);
    mutants.push(p);
    let mut p = permutation_proof.clone();
    p.responses.k_a = scalar(&p.responses.k_a);
    mutants.push(p);
    let mut p = permutation_proof.clone();
    p.responses.k_c = scalar(&p.responses.k_c);
    mutants.push(p);
    let mut p = permutation_proof.clone();
    p.responses.k_d = scalar(&p.responses.k_d);
    mutants.push(p);

    for (i, mutant) in mutants.iter().enumerate() {
        assert!(!check(mutant, &shuffle_proof), "permutation proof mutant {i}");
    }

    let mut mutants: Vec<ShuffleProof<C, W>> = vec![];
    for i in 0..size {
        let mut p = shuffle_proof.clone();
        p.responses.k_e_n[i] = scalar(&p.responses.k_e_n[i]);
        mutants.push(p);
    }
    for k in 0..W {
        let mut p = shuffle_proof.clone();
        p.responses.k_f[k] = scalar(&p.responses.k_f[k]);
        mutants.push(p);

        let mut p = shuffle_proof.clone();
        p.commitments.big_f_prime.0[0][k] = C::random_element();
        mutants.push(p);

        let mut p = shuffle_proof.clone();
        p.commitments.big_f_prime.0[1][k] = C::random_element();
        mutants.push(p);
    }
    let mut p = shuffle_proof.clone();
    p.commitments.big_a_prime = C::random_element();
    mutants.push(p);
    let mut p = shuffle_proof.clone();
    p.challenge = scalar(&p.challenge);
    mutants.push(p);
    let mut p = shuffle_proof.clone();
    p.responses.k_a = scalar(&p.responses.k_a);
    mutants.push(p);

    for (i, mutant) in mutants.iter().enumerate() {
        assert!(!check(&permutation_proof, mutant), "shuffle proof mutant {i}");
    }
}

#[test]
fn test_substituted_commitment() {
    init_tracing();
    substituted_commitment::<RCtx, 1>();
    substituted_commitment::<PCtx, 1>();
}

fn substituted_commitment<C: Context, const W: usize>() {
    let s = shuffled::<C, W>(Permutation::generate::<C>(6), 11);
    let systems = systems(&s, &ProofConfig::default());
    let verifier = ShuffleVerifier::new(&systems.permutation, &systems.shuffle).unwrap();
    let (permutation_proof, shuffle_proof) = prove(&s, &systems);

    // a fresh commitment to the same permutation
    let other: PermutationCommitment<C> = s
        .scheme
        .commit(&s.private.permutation, &s.scheme.random_randomizers())
        .unwrap();
    let mut public = s.public.clone();
    public.commitment = other.clone();

    assert!(!verifier
        .verify_shuffle(&permutation_proof, &shuffle_proof, &s.public.commitment, &public)
        .unwrap());
    assert!(!verifier
        .verify_shuffle(&permutation_proof, &shuffle_proof, &other, &public)
        .unwrap());
}

#[test]
fn test_mismatched_configuration() {
    init_tracing();
    let s = shuffled::<RCtx, 1>(Permutation::generate::<RCtx>(5), 3);
    let prover = systems(&s, &ProofConfig::new(SecurityParameters::new(60, 60, 20), "a"));
    let (permutation_proof, shuffle_proof) = prove(&s, &prover);

    for config in [
        ProofConfig::new(SecurityParameters::new(60, 60, 20), "b"),
        ProofConfig::new(SecurityParameters::new(80, 60, 20), "a"),
        ProofConfig::new(SecurityParameters::new(60, 80, 20), "a"),
    ] {
        let verifier_systems = systems(&s, &config);
        let verifier =
            ShuffleVerifier::new(&verifier_systems.permutation, &verifier_systems.shuffle).unwrap();
        assert!(!verifier
            .verify_shuffle(&permutation_proof, &shuffle_proof, &s.public.commitment, &s.public)
            .unwrap());
    }
}

#[test]
fn test_interactive_mix() {
    init_tracing();
    let s = shuffled::<RCtx, 2>(Permutation::generate::<RCtx>(8), 99);
    let (source, issuer) = challenge::interactive::<RCtx, _>(
        SecurityParameters::default(),
        8,
        rng::seeded_from_u64(100),
    );
    let verifier_thread = std::thread::spawn(move || issuer.serve());

    let permutation_system = PermutationCommitmentProofSystem::from_scheme(&s.scheme, &source).unwrap();
    let shuffle_system =
        ReEncryptionShuffleProofSystem::from_scheme(&s.scheme, s.keypair.pkey.clone(), &source)
            .unwrap();
    let permutation_proof = permutation_system
        .generate(
            &s.private.permutation,
            &s.private.commitment_randomizers,
            &s.public.commitment,
        )
        .unwrap();
    let shuffle_proof = shuffle_system.generate(&s.private, &s.public).unwrap();
    drop(permutation_system);
    drop(shuffle_system);
    drop(source);

    let record = verifier_thread.join().unwrap().unwrap();
    let permutation_system = PermutationCommitmentProofSystem::from_scheme(&s.scheme, &record).unwrap();
    let shuffle_system =
        ReEncryptionShuffleProofSystem::from_scheme(&s.scheme, s.keypair.pkey.clone(), &record)
            .unwrap();
    let verifier = ShuffleVerifier::new(&permutation_system, &shuffle_system).unwrap();

    assert!(verifier
        .verify_shuffle(&permutation_proof, &shuffle_proof, &s.public.commitment, &s.public)
        .unwrap());

    // Fiat-Shamir verification of an interactive proof fails
    let fs = systems(&s, &ProofConfig::default());
    let fs_verifier = ShuffleVerifier::new(&fs.permutation, &fs.shuffle).unwrap();
    assert!(!fs_verifier
        .verify_shuffle(&permutation_proof, &shuffle_proof, &s.public.commitment, &s.public)
        .unwrap());
}

#[test]
fn test_closed_challenge_channel() {
    let s = shuffled::<RCtx, 1>(Permutation::generate::<RCtx>(3), 1);
    let (source, issuer) = challenge::interactive::<RCtx, _>(
        SecurityParameters::default(),
        3,
        rng::seeded_from_u64(1),
    );
    drop(issuer);

    let system = PermutationCommitmentProofSystem::from_scheme(&s.scheme, source).unwrap();
    let result = system.generate(
        &s.private.permutation,
        &s.private.commitment_randomizers,
        &s.public.commitment,
    );
    assert_eq!(result.err(), Some(mixnet::Error::ChallengeChannelClosed));
}
