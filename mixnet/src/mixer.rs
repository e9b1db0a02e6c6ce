// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Re-encryption mixer

use crate::context::Context;
use crate::cryptosystem::elgamal::{Ciphertext, PublicKey};
use crate::permutation::Permutation;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::rng::CRng;

use rayon::prelude::*;
use tracing::instrument;

const LOG_TARGET: &str = "mixnet::mixer";

/**
 * Re-encryption mixer for batches of `N` ciphertexts of width `W`.
 *
 * Given input ciphertexts `x`, a permutation `p` and randomizations `r`,
 * [`shuffle`][`Self::shuffle`] outputs `y` with
 * `y[j] = ReEncrypt(x[p[j]], r[j])`: output position `j` holds the input
 * at pre-image index `p[j]`, re-encrypted with the randomization of output
 * position `j`.
 *
 * # Examples
 *
 * ```
 * use mixnet::context::Context;
 * use mixnet::context::RistrettoCtx as RCtx;
 * use mixnet::cryptosystem::elgamal::KeyPair;
 * use mixnet::mixer::ReEncryptionMixer;
 * use mixnet::permutation::Permutation;
 *
 * let keypair: KeyPair<RCtx> = KeyPair::generate();
 * let messages: Vec<[<RCtx as Context>::Element; 1]> =
 *     (0..4).map(|_| [RCtx::random_element()]).collect();
 * let ciphertexts: Vec<_> = messages.iter().map(|m| keypair.pkey.encrypt(m)).collect();
 *
 * let mixer = ReEncryptionMixer::<RCtx, 1>::new(keypair.pkey.clone(), 4);
 * let permutation = Permutation::generate::<RCtx>(4);
 * let randomizations = mixer.generate_randomizations();
 *
 * let shuffled = mixer.shuffle(&ciphertexts, &permutation, &randomizations).unwrap();
 * let decrypted: Vec<_> = shuffled.iter().map(|c| keypair.decrypt(c)).collect();
 *
 * assert_eq!(decrypted, permutation.apply(&messages).unwrap());
 * ```
 */
#[derive(Debug, Clone)]
pub struct ReEncryptionMixer<C: Context, const W: usize> {
    pk: PublicKey<C>,
    size: usize,
}

impl<C: Context, const W: usize> ReEncryptionMixer<C, W> {
    /// Construct a mixer for batches of `size` ciphertexts under `pk`.
    pub fn new(pk: PublicKey<C>, size: usize) -> Self {
        Self { pk, size }
    }

    /// The batch size `N`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The public key ciphertexts are re-encrypted under.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey<C> {
        &self.pk
    }

    /// Sample `N` independent uniform randomizations with the context rng.
    #[must_use]
    pub fn generate_randomizations(&self) -> Vec<[C::Scalar; W]> {
        self.generate_randomizations_with(&mut C::get_rng())
    }

    /// Sample `N` independent uniform randomizations with the given rng.
    pub fn generate_randomizations_with<R: CRng>(&self, rng: &mut R) -> Vec<[C::Scalar; W]> {
        (0..self.size).map(|_| <[C::Scalar; W]>::random(rng)).collect()
    }

    /// Permute and re-encrypt the given ciphertexts.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the mixer size is zero
    /// - `DimensionMismatch` if the ciphertexts, permutation or randomizations
    ///   do not all have length `N`; checked before any group operation
    #[instrument(target = LOG_TARGET, level = "debug", skip_all, fields(size = self.size))]
    pub fn shuffle(
        &self,
        ciphertexts: &[Ciphertext<C, W>],
        permutation: &Permutation,
        randomizations: &[[C::Scalar; W]],
    ) -> Result<Vec<Ciphertext<C, W>>, Error> {
        if self.size == 0 {
            return Err(Error::EmptyShuffle);
        }
        for found in [ciphertexts.len(), permutation.len(), randomizations.len()] {
            if found != self.size {
                return Err(Error::DimensionMismatch {
                    expected: self.size,
                    found,
                });
            }
        }

        let permuted = permutation.apply_refs(ciphertexts)?;
        let shuffled: Vec<Ciphertext<C, W>> = permuted
            .into_par_iter()
            .zip(randomizations.par_iter())
            .map(|(c, r)| c.re_encrypt(r, &self.pk.y))
            .collect();

        tracing::debug!(target: LOG_TARGET, count = shuffled.len(), "re-encrypted and permuted batch");
        Ok(shuffled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::P256Ctx as PCtx;
    use crate::context::RistrettoCtx as RCtx;
    use crate::cryptosystem::elgamal::KeyPair;
    use crate::utils::rng;
    use std::array;

    #[test]
    fn test_mixer_ristretto() {
        test_mixer::<RCtx, 1>();
        test_mixer::<RCtx, 3>();
        test_mixer_dimensions::<RCtx>();
        test_mixer_deterministic::<RCtx>();
    }

    #[test]
    fn test_mixer_p256() {
        test_mixer::<PCtx, 1>();
        test_mixer::<PCtx, 2>();
        test_mixer_dimensions::<PCtx>();
        test_mixer_deterministic::<PCtx>();
    }

    fn batch<C: Context, const W: usize>(
        keypair: &KeyPair<C>,
        count: usize,
    ) -> (Vec<[C::Element; W]>, Vec<Ciphertext<C, W>>) {
        let messages: Vec<[C::Element; W]> = (0..count)
            .map(|_| array::from_fn(|_| C::random_element()))
            .collect();
        let ciphertexts = messages.iter().map(|m| keypair.pkey.encrypt(m)).collect();

        (messages, ciphertexts)
    }

    fn test_mixer<C: Context, const W: usize>() {
        let count = 10;
        let keypair: KeyPair<C> = KeyPair::generate();
        let (messages, ciphertexts) = batch::<C, W>(&keypair, count);

        let mixer = ReEncryptionMixer::<C, W>::new(keypair.pkey.clone(), count);
        let permutation = Permutation::generate::<C>(count);
        let randomizations = mixer.generate_randomizations();
        let shuffled = mixer
            .shuffle(&ciphertexts, &permutation, &randomizations)
            .unwrap();

        for (j, c) in shuffled.iter().enumerate() {
            let i = permutation.get(j).unwrap();
            assert_eq!(keypair.decrypt(c), messages[i]);
            // every output is a fresh encryption
            assert_ne!(c, &ciphertexts[i]);
            assert_eq!(
                c,
                &ciphertexts[i].re_encrypt(&randomizations[j], &keypair.pkey.y)
            );
        }
    }

    fn test_mixer_dimensions<C: Context>() {
        let keypair: KeyPair<C> = KeyPair::generate();
        let (_, ciphertexts) = batch::<C, 1>(&keypair, 3);
        let mixer = ReEncryptionMixer::<C, 1>::new(keypair.pkey.clone(), 3);
        let randomizations = mixer.generate_randomizations();

        let short = mixer.shuffle(&ciphertexts[..2], &Permutation::identity(3), &randomizations);
        assert_eq!(
            short,
            Err(Error::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );

        let wrong_perm = mixer.shuffle(&ciphertexts, &Permutation::identity(4), &randomizations);
        assert!(matches!(wrong_perm, Err(Error::DimensionMismatch { .. })));

        let wrong_r = mixer.shuffle(&ciphertexts, &Permutation::identity(3), &randomizations[1..]);
        assert!(matches!(wrong_r, Err(Error::DimensionMismatch { .. })));

        let empty = ReEncryptionMixer::<C, 1>::new(keypair.pkey, 0);
        assert_eq!(
            empty.shuffle(&[], &Permutation::identity(0), &[]),
            Err(Error::EmptyShuffle)
        );
    }

    fn test_mixer_deterministic<C: Context>() {
        let keypair: KeyPair<C> = KeyPair::generate();
        let (_, ciphertexts) = batch::<C, 2>(&keypair, 6);
        let mixer = ReEncryptionMixer::<C, 2>::new(keypair.pkey.clone(), 6);

        let run = |seed: u64| {
            let mut rng = rng::seeded_from_u64(seed);
            let permutation = Permutation::random(6, &mut rng);
            let randomizations = mixer.generate_randomizations_with(&mut rng);
            mixer.shuffle(&ciphertexts, &permutation, &randomizations).unwrap()
        };

        assert_eq!(run(5), run(5));
        assert_ne!(run(5), run(6));
    }
}
