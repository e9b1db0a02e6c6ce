// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupElement implementations for P-256 group

use crate::groups::p256::scalar::P256Scalar;
use crate::traits::groups::GroupElement;
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{FDeserializable, FSerializable};
use p256::elliptic_curve::group::{Group, GroupEncoding};
use p256::{CompressedPoint, ProjectivePoint};

/// Length of a compressed SEC1 point; the identity encodes as all zeros.
const COMPRESSED_LEN: usize = 33;

/**
 * A [`GroupElement`] implementation for the P-256 group.
 */
#[derive(Debug, Clone, Copy)]
pub struct P256Element(pub ProjectivePoint);

impl P256Element {
    /// Wraps a p256 projective point.
    #[must_use]
    pub fn new(point: ProjectivePoint) -> Self {
        P256Element(point)
    }
}

#[allow(clippy::arithmetic_side_effects)]
impl GroupElement for P256Element {
    type Scalar = P256Scalar;

    fn one() -> Self {
        P256Element(ProjectivePoint::IDENTITY)
    }

    fn mul(&self, other: &Self) -> Self {
        P256Element(self.0 + other.0)
    }

    fn inv(&self) -> Self {
        P256Element(-self.0)
    }

    fn exp(&self, scalar: &P256Scalar) -> Self {
        P256Element(self.0 * scalar.0)
    }

    fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        P256Element(ProjectivePoint::random(rng))
    }
}

impl PartialEq for P256Element {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for P256Element {}

impl FSerializable for P256Element {
    fn size_bytes() -> usize {
        COMPRESSED_LEN
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.0.to_bytes());
    }
}

impl FDeserializable for P256Element {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() != COMPRESSED_LEN {
            return Err(Error::DeserializationError(format!(
                "Expected {COMPRESSED_LEN} bytes for P256 point, found {}",
                buffer.len()
            )));
        }
        let repr = CompressedPoint::from_slice(buffer);
        let point: Option<ProjectivePoint> = ProjectivePoint::from_bytes(repr).into();
        let point = point.ok_or(Error::DeserializationError(
            "Failed to decode P256 point".to_string(),
        ))?;

        // only the 0x02/0x03 tags and the all-zero identity are canonical
        if point.to_bytes().as_slice() != buffer {
            return Err(Error::DeserializationError(
                "Non-canonical P256 point encoding".to_string(),
            ));
        }

        Ok(P256Element(point))
    }
}
