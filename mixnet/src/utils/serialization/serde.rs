// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Serde implementations built on VSerializable, FSerializable

use crate::commitment::PermutationCommitment;
use crate::context::{Context, P256Ctx, RistrettoCtx};
use crate::cryptosystem::elgamal;
use crate::utils::serialization::{FDeserializable, FSerializable};
use crate::utils::serialization::{VDeserializable, VSerializable};
use crate::zkp::{permutation::PermutationProof, shuffle::ShuffleProof};
use serde::{self, de::Error, Deserializer, Serializer};

/// Implement serde serialization for variable length serializable types.
macro_rules! implement_serde_v {
    ($type:ty $(, const $param:ident : usize)*) => {
        impl<'de, C: Context $(, const $param: usize)*> serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
                Self::deser(&bytes).map_err(D::Error::custom)
            }
        }

        impl<C: Context $(, const $param: usize)*> serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_bytes(&self.ser())
            }
        }
    };
}

/// Implement serde serialization for fixed length serializable types.
macro_rules! implement_serde_f {
    ($type:ty $(, const $param:ident : usize)*) => {
        impl<'de, C: Context $(, const $param: usize)*> serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
                Self::deser_f(&bytes).map_err(D::Error::custom)
            }
        }

        impl<C: Context $(, const $param: usize)*> serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_bytes(&self.ser_f())
            }
        }
    };
}

// elgamal::PublicKey
implement_serde_f!(elgamal::PublicKey<C>);

// elgamal::Ciphertext
implement_serde_f!(elgamal::Ciphertext<C, W>, const W: usize);

// PermutationCommitment
implement_serde_v!(PermutationCommitment<C>);

// PermutationProof
implement_serde_v!(PermutationProof<C>);

// ShuffleProof
implement_serde_v!(ShuffleProof<C, W>, const W: usize);

// RistrettoCtx
impl<'de> serde::Deserialize<'de> for RistrettoCtx {
    fn deserialize<D>(_deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RistrettoCtx)
    }
}

impl serde::Serialize for RistrettoCtx {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&[])
    }
}

// P256Ctx
impl<'de> serde::Deserialize<'de> for P256Ctx {
    fn deserialize<D>(_deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(P256Ctx)
    }
}

impl serde::Serialize for P256Ctx {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&[])
    }
}
