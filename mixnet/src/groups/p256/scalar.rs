// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupScalar implementations for P-256 group

use crate::traits::groups::{BaseScalar, GroupScalar};
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{FDeserializable, FSerializable};
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::{Field, PrimeField};
use p256::{FieldBytes, Scalar, U256};

/**
 * A [`GroupScalar`] implementation for the P-256 group.
 */
#[derive(Debug, Clone, Copy)]
pub struct P256Scalar(pub Scalar);

impl P256Scalar {
    /// Create a new `P256Scalar` from a p256 [Scalar](https://docs.rs/p256/latest/p256/struct.Scalar.html).
    #[must_use]
    pub fn new(scalar: Scalar) -> Self {
        P256Scalar(scalar)
    }
}

#[allow(clippy::arithmetic_side_effects)]
impl GroupScalar for P256Scalar {
    fn zero() -> Self {
        P256Scalar(Scalar::ZERO)
    }

    fn one() -> Self {
        P256Scalar(Scalar::ONE)
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        P256Scalar(Scalar::random(rng))
    }

    fn add(&self, other: &Self) -> Self {
        P256Scalar(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        P256Scalar(self.0 - other.0)
    }

    fn mul(&self, other: &Self) -> Self {
        P256Scalar(self.0 * other.0)
    }

    fn neg(&self) -> Self {
        P256Scalar(-self.0)
    }

    fn inv(&self) -> Option<Self> {
        let inverted: Option<Scalar> = self.0.invert().into();
        inverted.map(P256Scalar)
    }

    fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl BaseScalar for P256Scalar {
    fn from_le_bytes_mod_order(bytes: &[u8; 32]) -> Self {
        let mut be = *bytes;
        be.reverse();
        let be = FieldBytes::from(be);

        P256Scalar(<Scalar as Reduce<U256>>::reduce_bytes(&be))
    }
}

impl From<u32> for P256Scalar {
    fn from(u: u32) -> P256Scalar {
        P256Scalar(Scalar::from(u64::from(u)))
    }
}

impl PartialEq for P256Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for P256Scalar {}

impl FSerializable for P256Scalar {
    fn size_bytes() -> usize {
        32
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.0.to_bytes());
    }
}

impl FDeserializable for P256Scalar {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let bytes = <[u8; 32]>::try_from(buffer)?;
        let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(bytes)).into();

        scalar.map(P256Scalar).ok_or(Error::DeserializationError(
            "Failed to parse P256 scalar bytes".to_string(),
        ))
    }
}
