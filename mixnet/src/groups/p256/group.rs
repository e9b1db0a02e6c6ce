// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! CryptographicGroup implementations for the P-256 group

use crate::groups::p256::element::P256Element;
use crate::groups::p256::scalar::P256Scalar;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::hash;
use crate::utils::rng;

use p256::elliptic_curve::hash2curve::{ExpandMsgXmd, GroupDigest};
use p256::NistP256;
use p256::ProjectivePoint;
use rayon::prelude::*;

/// P-256 implementation of [`CryptographicGroup`]
pub struct P256Group;

#[allow(clippy::arithmetic_side_effects)]
impl CryptographicGroup for P256Group {
    type Element = P256Element;
    type Scalar = P256Scalar;
    type Hasher = hash::Hasher256;

    const ORDER_BITS: usize = 256;

    fn generator() -> Self::Element {
        P256Element::new(ProjectivePoint::GENERATOR)
    }

    fn g_exp(scalar: &Self::Scalar) -> Self::Element {
        P256Element::new(ProjectivePoint::GENERATOR * scalar.0)
    }

    /// # Errors
    ///
    /// - `GroupOperation` if `NistP256::hash_to_scalar` fails, for example
    ///   on empty domain separation tags
    fn hash_to_scalar(input_slices: &[&[u8]], ds_tags: &[&[u8]]) -> Result<Self::Scalar, Error> {
        let ret = NistP256::hash_to_scalar::<ExpandMsgXmd<Self::Hasher>>(input_slices, ds_tags)?;

        Ok(P256Scalar(ret))
    }

    /// # Errors
    ///
    /// - `GroupOperation` if `NistP256::hash_from_bytes` fails
    fn hash_to_element(
        input_slices: &[&[u8]],
        ds_tags: &[&[u8]],
    ) -> Result<Self::Element, Error> {
        let ret = NistP256::hash_from_bytes::<ExpandMsgXmd<Self::Hasher>>(input_slices, ds_tags)?;

        Ok(P256Element(ret))
    }

    fn random_element<R: rng::CRng>(rng: &mut R) -> Self::Element {
        Self::Element::random(rng)
    }

    fn random_scalar<R: rng::CRng>(rng: &mut R) -> Self::Scalar {
        Self::Scalar::random(rng)
    }

    fn ind_generators(count: usize, label: &[u8]) -> Result<Vec<Self::Element>, Error> {
        let ds_tags: &[&[u8]] = &[b"label", b"independent_generators_p256_counter"];

        (0..count)
            .into_par_iter()
            .map(|i| {
                let counter = (i as u64).to_be_bytes();
                Self::hash_to_element(&[label, &counter], ds_tags)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::groups::BaseScalar;
    use crate::utils::serialization::{FDeserializable, FSerializable};

    #[test]
    fn test_identity_encoding() {
        let one = P256Element::one();
        let bytes = one.ser_f();

        assert_eq!(bytes, vec![0u8; 33]);
        assert_eq!(P256Element::deser_f(&bytes).unwrap(), one);
    }

    #[test]
    fn test_invalid_point_rejected() {
        let mut bytes = P256Group::generator().ser_f();
        bytes[0] = 0x05;
        assert!(P256Element::deser_f(&bytes).is_err());
    }

    #[test]
    fn test_non_canonical_tags_rejected() {
        let mut rng = rng::seeded_from_u64(3);
        for _ in 0..8 {
            let bytes = P256Group::random_element(&mut rng).ser_f();
            assert_eq!(P256Element::deser_f(&bytes).unwrap().ser_f(), bytes);

            for tag in [0x00, 0x04, 0x05, 0x06, 0x07] {
                let mut mutated = bytes.clone();
                mutated[0] = tag;
                assert!(P256Element::deser_f(&mutated).is_err());
            }
        }

        let mut identity = vec![0u8; 33];
        identity[32] = 1;
        assert!(P256Element::deser_f(&identity).is_err());
    }

    #[test]
    fn test_le_bytes_embedding() {
        let mut bytes = [0u8; 32];
        bytes[0] = 5;
        bytes[1] = 1;

        assert_eq!(P256Scalar::from_le_bytes_mod_order(&bytes), P256Scalar::from(261u32));
    }

    #[test]
    fn test_ind_generators_are_deterministic() {
        let a = P256Group::ind_generators(4, b"label").unwrap();
        let b = P256Group::ind_generators(4, b"label").unwrap();

        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }
}
