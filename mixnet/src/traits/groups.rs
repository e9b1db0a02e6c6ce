// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Group, element and scalar abstractions
//!
//! Groups are written multiplicatively: `mul` is the group operation and
//! `exp` is exponentiation by a scalar, whatever the notation of the backing
//! curve library.

use crate::utils::error::Error;
use crate::utils::hash::Hasher;
use crate::utils::rng;
use rayon::prelude::*;
use std::fmt::Debug;

/// An element of a prime order group.
pub trait GroupElement: Sized + Debug + PartialEq {
    /// The scalar type used as exponent.
    type Scalar: GroupScalar;

    /// The identity element.
    fn one() -> Self;

    /// The group operation.
    #[must_use]
    fn mul(&self, other: &Self) -> Self;

    /// The inverse element.
    #[must_use]
    fn inv(&self) -> Self;

    /// Exponentiation by a scalar.
    #[must_use]
    fn exp(&self, scalar: &Self::Scalar) -> Self;

    /// Element equality.
    fn equals(&self, other: &Self) -> bool;

    /// A uniformly random element.
    fn random<R: rng::CRng>(rng: &mut R) -> Self;
}

/// A scalar modulo the group order.
pub trait GroupScalar: Sized + Debug + PartialEq {
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// A uniformly random scalar.
    fn random<R: rng::CRng>(rng: &mut R) -> Self;

    /// Modular addition.
    #[must_use]
    fn add(&self, other: &Self) -> Self;

    /// Modular subtraction.
    #[must_use]
    fn sub(&self, other: &Self) -> Self;

    /// Modular multiplication.
    #[must_use]
    fn mul(&self, other: &Self) -> Self;

    /// Additive inverse.
    #[must_use]
    fn neg(&self) -> Self;

    /// Multiplicative inverse, `None` for zero.
    fn inv(&self) -> Option<Self>;

    /// Scalar equality.
    fn equals(&self, other: &Self) -> bool;
}

/// Scalars of a single group, as opposed to products.
pub trait BaseScalar: GroupScalar {
    /// Reduces a little endian 256 bit integer modulo the group order.
    ///
    /// Values below the group order map to themselves, which is how
    /// bounded challenges and masks are embedded into the scalar field.
    fn from_le_bytes_mod_order(bytes: &[u8; 32]) -> Self;
}

/// A prime order group suitable for ElGamal and Pedersen commitments.
pub trait CryptographicGroup {
    /// Element type.
    type Element: GroupElement<Scalar = Self::Scalar> + Clone + Send + Sync;

    /// Scalar type.
    type Scalar: BaseScalar + Clone + Send + Sync;

    /// Hash function used for hashing into the group and its scalar field.
    type Hasher: Hasher;

    /// Bit length of the group order.
    const ORDER_BITS: usize;

    /// The default generator `g`.
    fn generator() -> Self::Element;

    /// Computes `g^scalar`.
    fn g_exp(scalar: &Self::Scalar) -> Self::Element;

    /// Hashes the given inputs to a scalar.
    ///
    /// # Errors
    ///
    /// - `GroupOperation` if the backend cannot hash the input
    fn hash_to_scalar(input_slices: &[&[u8]], ds_tags: &[&[u8]]) -> Result<Self::Scalar, Error>;

    /// Hashes the given inputs to an element with unknown discrete logarithm.
    ///
    /// # Errors
    ///
    /// - `GroupOperation` if the backend cannot hash the input
    fn hash_to_element(input_slices: &[&[u8]], ds_tags: &[&[u8]])
    -> Result<Self::Element, Error>;

    /// A uniformly random element.
    fn random_element<R: rng::CRng>(rng: &mut R) -> Self::Element;

    /// A uniformly random scalar.
    fn random_scalar<R: rng::CRng>(rng: &mut R) -> Self::Scalar;

    /// Derives `count` independent generators from a public label.
    ///
    /// Every party calling this with the same label obtains the same
    /// generators; nobody knows their discrete logarithms relative to each
    /// other or to [`generator`][`Self::generator`].
    ///
    /// # Errors
    ///
    /// - `GroupOperation` if hashing to the group fails
    fn ind_generators(count: usize, label: &[u8]) -> Result<Vec<Self::Element>, Error>;

    /// Computes `prod bases_i^scalars_i`.
    ///
    /// Slices of unequal length are truncated to the shorter one.
    fn multi_exp(bases: &[Self::Element], scalars: &[Self::Scalar]) -> Self::Element {
        bases
            .par_iter()
            .zip(scalars.par_iter())
            .map(|(b, s)| b.exp(s))
            .reduce(Self::Element::one, |a, b| a.mul(&b))
    }
}

/// Operations between an element and a product of elements, applied
/// component-wise with the element replicated: `a . (b_1, b_2) = (a . b_1, a . b_2)`.
pub trait ReplGroupOps<Other: GroupElement> {
    /// The product result type.
    type Result;

    /// `(self * other_1, self * other_2, ..)`
    fn repl_mul(&self, other: &Other) -> Self::Result;

    /// `(self ^ other_1, self ^ other_2, ..)`
    fn repl_exp(&self, other: &Other::Scalar) -> Self::Result;

    /// True if every component of `other` equals `self`.
    fn repl_equals(&self, other: &Other) -> bool;
}

/// Operations between a product of elements and a single element, distributed
/// over the components: `(a_1, a_2) . b = (a_1 . b, a_2 . b)`.
pub trait DistGroupOps<Other: GroupElement> {
    /// The product result type.
    type Result;

    /// `(self_1 * other, self_2 * other, ..)`
    fn dist_mul(&self, other: &Other) -> Self::Result;

    /// `(self_1 ^ other, self_2 ^ other, ..)`
    fn dist_exp(&self, other: &Other::Scalar) -> Self::Result;

    /// True if every component of `self` equals `other`.
    fn dist_equals(&self, other: &Other) -> bool;
}

/// Scalar analogue of [`ReplGroupOps`].
pub trait ReplScalarOps<Other> {
    /// The product result type.
    type Output;

    /// `(self + other_1, self + other_2, ..)`
    fn repl_add(&self, other: &Other) -> Self::Output;

    /// `(self - other_1, self - other_2, ..)`
    fn repl_sub(&self, other: &Other) -> Self::Output;

    /// `(self * other_1, self * other_2, ..)`
    fn repl_mul(&self, other: &Other) -> Self::Output;

    /// True if every component of `other` equals `self`.
    fn repl_equals(&self, other: &Other) -> bool;
}

/// Scalar analogue of [`DistGroupOps`].
pub trait DistScalarOps<Other> {
    /// The product result type.
    type Output;

    /// `(self_1 + other, self_2 + other, ..)`
    fn dist_add(&self, other: &Other) -> Self::Output;

    /// `(self_1 - other, self_2 - other, ..)`
    fn dist_sub(&self, other: &Other) -> Self::Output;

    /// `(self_1 * other, self_2 * other, ..)`
    fn dist_mul(&self, other: &Other) -> Self::Output;

    /// True if every component of `self` equals `other`.
    fn dist_equals(&self, other: &Other) -> bool;
}
