// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! CryptographicGroup implementations for the Ristretto255 group

use crate::groups::ristretto255::element::RistrettoElement;
use crate::groups::ristretto255::scalar::RistrettoScalar;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::hash::{self, Hasher};
use crate::utils::rng;

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use rayon::prelude::*;

/// Ristretto255 implementation of [`CryptographicGroup`]
pub struct Ristretto255Group;

impl CryptographicGroup for Ristretto255Group {
    type Element = RistrettoElement;
    type Scalar = RistrettoScalar;
    type Hasher = hash::Hasher512;

    // l = 2^252 + 27742317777372353535851937790883648493
    const ORDER_BITS: usize = 253;

    fn generator() -> Self::Element {
        RistrettoElement::new(RISTRETTO_BASEPOINT_POINT)
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn g_exp(scalar: &Self::Scalar) -> Self::Element {
        RistrettoElement::new(RISTRETTO_BASEPOINT_POINT * scalar.0)
    }

    fn hash_to_scalar(input_slices: &[&[u8]], ds_tags: &[&[u8]]) -> Result<Self::Scalar, Error> {
        let mut hasher = Self::Hasher::hasher();
        hash::update_hasher(&mut hasher, input_slices, ds_tags);

        Ok(RistrettoScalar::from_hash(hasher))
    }

    fn hash_to_element(
        input_slices: &[&[u8]],
        ds_tags: &[&[u8]],
    ) -> Result<Self::Element, Error> {
        let mut hasher = Self::Hasher::hasher();
        hash::update_hasher(&mut hasher, input_slices, ds_tags);

        Ok(RistrettoElement::from_hash(hasher))
    }

    fn random_element<R: rng::CRng>(rng: &mut R) -> Self::Element {
        Self::Element::random(rng)
    }

    fn random_scalar<R: rng::CRng>(rng: &mut R) -> Self::Scalar {
        Self::Scalar::random(rng)
    }

    fn ind_generators(count: usize, label: &[u8]) -> Result<Vec<Self::Element>, Error> {
        let ds_tags: &[&[u8]] = &[b"label", b"independent_generators_ristretto_counter"];

        (0..count)
            .into_par_iter()
            .map(|i| {
                let counter = (i as u64).to_be_bytes();
                Self::hash_to_element(&[label, &counter], ds_tags)
            })
            .collect()
    }

    fn multi_exp(bases: &[Self::Element], scalars: &[Self::Scalar]) -> Self::Element {
        let len = bases.len().min(scalars.len());
        let points = bases.iter().take(len).map(|b| b.0);
        let scalars = scalars.iter().take(len).map(|s| s.0);

        RistrettoElement::new(RistrettoPoint::vartime_multiscalar_mul(scalars, points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::groups::GroupScalar;
    use crate::utils::serialization::{FDeserializable, FSerializable};

    #[test]
    fn test_ind_generators_are_deterministic() {
        let a = Ristretto255Group::ind_generators(5, b"label").unwrap();
        let b = Ristretto255Group::ind_generators(5, b"label").unwrap();
        let c = Ristretto255Group::ind_generators(5, b"other").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        for (i, x) in a.iter().enumerate() {
            for y in a.iter().skip(i + 1) {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn test_multi_exp_matches_naive() {
        let mut rng = rng::seeded_from_u64(1);
        let bases: Vec<RistrettoElement> = (0..20).map(|_| RistrettoElement::random(&mut rng)).collect();
        let scalars: Vec<RistrettoScalar> =
            (0..20).map(|_| RistrettoScalar::random(&mut rng)).collect();

        let naive = bases
            .iter()
            .zip(scalars.iter())
            .fold(RistrettoElement::one(), |acc, (b, s)| acc.mul(&b.exp(s)));

        assert_eq!(Ristretto255Group::multi_exp(&bases, &scalars), naive);
        assert_eq!(Ristretto255Group::multi_exp(&[], &[]), RistrettoElement::one());
    }

    #[test]
    fn test_element_encoding_rejects_invalid() {
        let e = Ristretto255Group::g_exp(&RistrettoScalar::from(7u32));
        let bytes = e.ser_f();
        assert_eq!(RistrettoElement::deser_f(&bytes).unwrap(), e);

        // not a canonical field element encoding
        assert!(RistrettoElement::deser_f(&[0xff; 32]).is_err());
        assert!(RistrettoElement::deser_f(&bytes[..31]).is_err());
    }
}
