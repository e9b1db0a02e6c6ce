// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupElement implementations for the Ristretto255 group

use crate::groups::ristretto255::scalar::RistrettoScalar;
use crate::traits::groups::GroupElement;
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{FDeserializable, FSerializable};
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::traits::Identity;
use sha3::digest::typenum::U64;
use sha3::digest::Digest;

/**
 * A [`GroupElement`] implementation for the Ristretto group.
 */
#[derive(Copy, Clone, Debug)]
pub struct RistrettoElement(pub RistrettoPoint);

impl RistrettoElement {
    /// Wraps a dalek point.
    #[must_use]
    pub fn new(point: RistrettoPoint) -> Self {
        RistrettoElement(point)
    }

    /// Maps a 512 bit hash to a point with unknown discrete logarithm.
    pub fn from_hash<D: Digest<OutputSize = U64> + Default>(hasher: D) -> Self {
        RistrettoElement(RistrettoPoint::from_hash(hasher))
    }
}

#[allow(clippy::arithmetic_side_effects)]
impl GroupElement for RistrettoElement {
    type Scalar = RistrettoScalar;

    #[inline]
    fn one() -> Self {
        RistrettoElement(RistrettoPoint::identity())
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        RistrettoElement(self.0 + other.0)
    }

    #[inline]
    fn inv(&self) -> Self {
        RistrettoElement(-self.0)
    }

    #[inline]
    fn exp(&self, scalar: &RistrettoScalar) -> Self {
        RistrettoElement(self.0 * scalar.0)
    }

    #[inline]
    fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        RistrettoElement(RistrettoPoint::random(rng))
    }
}

impl PartialEq for RistrettoElement {
    fn eq(&self, other: &Self) -> bool {
        GroupElement::equals(self, other)
    }
}

impl Eq for RistrettoElement {}

impl FSerializable for RistrettoElement {
    fn size_bytes() -> usize {
        32
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.0.compress().as_bytes());
    }
}

impl FDeserializable for RistrettoElement {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let compressed = CompressedRistretto::from_slice(buffer).map_err(|_| {
            Error::DeserializationError("Expected 32 bytes for Ristretto point".to_string())
        })?;

        compressed
            .decompress()
            .map(RistrettoElement)
            .ok_or(Error::DeserializationError(
                "Failed to decompress Ristretto point".to_string(),
            ))
    }
}
