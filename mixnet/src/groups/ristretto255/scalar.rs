// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupScalar implementations for the Ristretto255 group

use crate::traits::groups::{BaseScalar, GroupScalar};
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{FDeserializable, FSerializable};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use sha3::digest::typenum::U64;
use sha3::digest::Digest;

/**
 * A [`GroupScalar`] implementation for the [Ristretto](https://docs.rs/curve25519-dalek/latest/curve25519_dalek/ristretto/index.html) group.
 */
#[derive(Copy, Clone, Debug)]
pub struct RistrettoScalar(pub DalekScalar);

impl RistrettoScalar {
    /// Create a new `RistrettoScalar` from a 512 bit hash.
    pub fn from_hash<D: Digest<OutputSize = U64>>(hasher: D) -> Self {
        RistrettoScalar(DalekScalar::from_hash::<D>(hasher))
    }
}

#[allow(clippy::arithmetic_side_effects)]
impl GroupScalar for RistrettoScalar {
    #[inline]
    fn zero() -> Self {
        RistrettoScalar(DalekScalar::ZERO)
    }

    #[inline]
    fn one() -> Self {
        RistrettoScalar(DalekScalar::ONE)
    }

    #[inline]
    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        RistrettoScalar(DalekScalar::random(rng))
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        RistrettoScalar(self.0 + other.0)
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        RistrettoScalar(self.0 - other.0)
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        RistrettoScalar(self.0 * other.0)
    }

    #[inline]
    fn neg(&self) -> Self {
        RistrettoScalar(-self.0)
    }

    #[inline]
    fn inv(&self) -> Option<Self> {
        if self.0 == DalekScalar::ZERO {
            None
        } else {
            Some(RistrettoScalar(self.0.invert()))
        }
    }

    #[inline]
    fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl BaseScalar for RistrettoScalar {
    fn from_le_bytes_mod_order(bytes: &[u8; 32]) -> Self {
        RistrettoScalar(DalekScalar::from_bytes_mod_order(*bytes))
    }
}

impl From<u32> for RistrettoScalar {
    fn from(u: u32) -> RistrettoScalar {
        RistrettoScalar(DalekScalar::from(u))
    }
}

impl PartialEq for RistrettoScalar {
    fn eq(&self, other: &Self) -> bool {
        GroupScalar::equals(self, other)
    }
}

impl Eq for RistrettoScalar {}

impl FSerializable for RistrettoScalar {
    fn size_bytes() -> usize {
        32
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.0.as_bytes());
    }
}

impl FDeserializable for RistrettoScalar {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let bytes = <[u8; 32]>::try_from(buffer)?;
        let opt: Option<RistrettoScalar> = DalekScalar::from_canonical_bytes(bytes)
            .map(RistrettoScalar)
            .into();

        opt.ok_or(Error::DeserializationError(
            "Failed to parse Ristretto scalar bytes".to_string(),
        ))
    }
}
