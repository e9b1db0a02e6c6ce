// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! ElGamal cryptosystem

use crate::context::Context;
use crate::traits::groups::DistGroupOps;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::traits::groups::ReplGroupOps;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{FDeserializable, FSerializable};

/**
 * An `ElGamal` key pair.
 *
 * # Examples
 *
 * ```
 * use mixnet::cryptosystem::elgamal::KeyPair;
 * use mixnet::context::Context;
 * use mixnet::context::RistrettoCtx as RCtx;
 *
 * let keypair: KeyPair<RCtx> = KeyPair::generate();
 * let message = [RCtx::random_element(), RCtx::random_element()];
 * let ciphertext = keypair.pkey.encrypt(&message);
 *
 * assert_eq!(message, keypair.decrypt(&ciphertext));
 * ```
 */
#[derive(Debug, PartialEq, Clone)]
pub struct KeyPair<C: Context> {
    /// the private key as a raw group scalar
    pub skey: C::Scalar,
    /// the public key
    pub pkey: PublicKey<C>,
}

impl<C: Context> KeyPair<C> {
    /// Construct a key pair from an existing secret and public value.
    pub fn new(skey: C::Scalar, pkey: C::Element) -> KeyPair<C> {
        KeyPair {
            skey,
            pkey: PublicKey::new(pkey),
        }
    }

    /// Generate a fresh key pair with the rng of the context.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut C::get_rng())
    }

    /// Generate a fresh key pair with the given rng.
    pub fn generate_with<R: CRng>(rng: &mut R) -> Self {
        let skey = C::Scalar::random(rng);
        let pkey = C::generator().exp(&skey);

        Self::new(skey, pkey)
    }

    /// Decrypt the given ciphertext, of arbitrary width `W`.
    ///
    /// Computes `v / u^x` component-wise.
    pub fn decrypt<const W: usize>(&self, ciphertext: &Ciphertext<C, W>) -> [C::Element; W] {
        let u_pow_neg_x = ciphertext.u().dist_exp(&self.skey.neg());

        ciphertext.v().mul(&u_pow_neg_x)
    }
}

/**
 * An `ElGamal` public key `y = g^x`.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey<C: Context> {
    /// the public key as a raw group element
    pub y: C::Element,
}

impl<C: Context> PublicKey<C> {
    /// Construct a public key from its group element.
    pub fn new(y: C::Element) -> Self {
        Self { y }
    }

    /// Encrypt the given message with fresh randomness from the context rng.
    pub fn encrypt<const W: usize>(&self, message: &[C::Element; W]) -> Ciphertext<C, W> {
        let r = <[C::Scalar; W]>::random(&mut C::get_rng());

        self.encrypt_with_r(message, &r)
    }

    /// Encrypt the given message with the given randomness:
    /// `(g^r, m * y^r)`, component-wise.
    pub fn encrypt_with_r<const W: usize>(
        &self,
        message: &[C::Element; W],
        r: &[C::Scalar; W],
    ) -> Ciphertext<C, W> {
        let u = C::generator().repl_exp(r);
        let v = message.mul(&self.y.repl_exp(r));

        Ciphertext([u, v])
    }

    /// The encryption of the identity with randomness `r`, `(g^r, y^r)`.
    ///
    /// Multiplying a ciphertext by this value re-encrypts it.
    pub fn encrypt_one<const W: usize>(&self, r: &[C::Scalar; W]) -> Ciphertext<C, W> {
        Ciphertext([C::generator().repl_exp(r), self.y.repl_exp(r)])
    }
}

/**
 * An `ElGamal` ciphertext `(u, v)`, each part of width `W`.
 *
 * Ciphertexts form a group under component-wise multiplication, which the
 * proofs of shuffle use to batch many ciphertexts into one.
 */
#[derive(Debug, PartialEq, Clone)]
pub struct Ciphertext<C: Context, const W: usize>(pub [[C::Element; W]; 2]);

impl<C: Context, const W: usize> Ciphertext<C, W> {
    /// Construct a ciphertext with given values `u` and `v`.
    pub fn new(u: [C::Element; W], v: [C::Element; W]) -> Self {
        Ciphertext([u, v])
    }

    /// Re-encrypt with fresh randomness `r_n` under public key `pk`:
    /// multiplies by `(g^r_n, pk^r_n)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mixnet::cryptosystem::elgamal::KeyPair;
    /// use mixnet::context::Context;
    /// use mixnet::context::RistrettoCtx as RCtx;
    ///
    /// let keypair: KeyPair<RCtx> = KeyPair::generate();
    /// let message = [RCtx::random_element()];
    /// let ciphertext = keypair.pkey.encrypt(&message);
    /// let re_encrypted = ciphertext.re_encrypt(&[RCtx::random_scalar()], &keypair.pkey.y);
    ///
    /// assert_ne!(ciphertext, re_encrypted);
    /// assert_eq!(keypair.decrypt(&re_encrypted), message);
    /// ```
    #[must_use]
    pub fn re_encrypt(&self, r_n: &[C::Scalar; W], pk: &C::Element) -> Self {
        let one = [C::generator().repl_exp(r_n), pk.repl_exp(r_n)];

        Self(self.0.mul(&one))
    }

    /// Component-wise product of two ciphertexts.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self(self.0.mul(&other.0))
    }

    /// Raises every component to the given scalar.
    #[must_use]
    pub fn exp(&self, scalar: &C::Scalar) -> Self {
        Self(self.0.clone().map(|part| part.dist_exp(scalar)))
    }

    /// The identity ciphertext `(1, 1)`.
    #[must_use]
    pub fn one() -> Self {
        Self(<[[C::Element; W]; 2]>::one())
    }

    /// Get a reference to the `u` component of the ciphertext.
    pub fn u(&self) -> &[C::Element; W] {
        &self.0[0]
    }

    /// Get a reference to the `v` component of the ciphertext.
    pub fn v(&self) -> &[C::Element; W] {
        &self.0[1]
    }
}

impl<C: Context> FSerializable for PublicKey<C> {
    fn size_bytes() -> usize {
        C::Element::size_bytes()
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        self.y.ser_into(buffer);
    }
}

impl<C: Context> FDeserializable for PublicKey<C> {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(C::Element::deser_f(buffer)?))
    }
}

impl<C: Context, const W: usize> FSerializable for Ciphertext<C, W> {
    fn size_bytes() -> usize {
        <[[C::Element; W]; 2]>::size_bytes()
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        self.0.ser_into(buffer);
    }
}

impl<C: Context, const W: usize> FDeserializable for Ciphertext<C, W> {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self(<[[C::Element; W]; 2]>::deser_f(buffer)?))
    }
}
