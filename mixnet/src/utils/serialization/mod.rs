// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Serialization
//!
//! This module defines and implements serialization traits
//!
//! * `fixed`: types whose instances all serialize to the same number of bytes
//!   (group elements, scalars, products of those, ciphertexts). Sizes are
//!   known up front, so fixed types concatenate without delimiters.
//!
//! * `variable`: types whose serialized length depends on the instance
//!   (vectors, commitments, proofs). Vectors carry a `u32` big endian
//!   length prefix.
//!
//! Serialized bytes feed challenge derivation and the commitment equality
//! check of the verifier, so encodings must stay stable across builds.
//!
//! # Examples
//!
//! ```
//! use mixnet::context::Context;
//! use mixnet::context::RistrettoCtx as Ctx;
//! use mixnet::utils::serialization::{FSerializable, VDeserializable, VSerializable};
//!
//! let elements: Vec<[<Ctx as Context>::Element; 2]> =
//!     (0..3).map(|_| [Ctx::random_element(), Ctx::random_element()]).collect();
//!
//! let bytes = elements.ser();
//! assert_eq!(bytes.len(), 4 + 3 * <[<Ctx as Context>::Element; 2]>::size_bytes());
//!
//! let back = Vec::<[<Ctx as Context>::Element; 2]>::deser(&bytes).unwrap();
//! assert_eq!(elements, back);
//! ```

use crate::utils::error::Error;

/// Serde implementations built on `V/FSerializable` traits
#[cfg(feature = "serde")]
pub mod serde;

/// Fixed length serialization.
pub trait FSerializable {
    /// The number of bytes every instance serializes to.
    fn size_bytes() -> usize;

    /// Appends the serialized bytes to `buffer`.
    fn ser_into(&self, buffer: &mut Vec<u8>);

    /// Returns the serialized bytes.
    fn ser_f(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(Self::size_bytes());
        self.ser_into(&mut buffer);
        buffer
    }
}

/// Fixed length deserialization.
pub trait FDeserializable: Sized {
    /// Parses exactly [`FSerializable::size_bytes`] bytes.
    ///
    /// # Errors
    ///
    /// - `DeserializationError` if the bytes are not a valid encoding
    fn deser_f(buffer: &[u8]) -> Result<Self, Error>;
}

/// Variable length serialization.
pub trait VSerializable {
    /// Returns the serialized bytes.
    fn ser(&self) -> Vec<u8>;
}

/// Variable length deserialization.
pub trait VDeserializable: Sized {
    /// Parses the whole buffer.
    ///
    /// # Errors
    ///
    /// - `DeserializationError` if the bytes are not a valid encoding or
    ///   trailing bytes remain
    fn deser(buffer: &[u8]) -> Result<Self, Error>;
}

impl<T: FSerializable, const N: usize> FSerializable for [T; N] {
    fn size_bytes() -> usize {
        T::size_bytes() * N
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        for item in self {
            item.ser_into(buffer);
        }
    }
}

impl<T: FDeserializable + FSerializable, const N: usize> FDeserializable for [T; N] {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let size = T::size_bytes();
        if buffer.len() != size * N {
            return Err(Error::DeserializationError(format!(
                "Expected {} bytes for array, found {}",
                size * N,
                buffer.len()
            )));
        }
        let items: Vec<T> = buffer
            .chunks_exact(size)
            .map(T::deser_f)
            .collect::<Result<_, _>>()?;

        items.try_into().map_err(|_| {
            Error::DeserializationError("Array length mismatch".to_string())
        })
    }
}

impl<T: FSerializable> VSerializable for Vec<T> {
    fn ser(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(4 + self.len() * T::size_bytes());
        write_vec(&mut buffer, self);
        buffer
    }
}

impl<T: FSerializable + FDeserializable> VDeserializable for Vec<T> {
    fn deser(buffer: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(buffer);
        let ret = reader.read_vec()?;
        reader.finish()?;
        Ok(ret)
    }
}

impl FSerializable for u32 {
    fn size_bytes() -> usize {
        4
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.to_be_bytes());
    }
}

impl FDeserializable for u32 {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let bytes = <[u8; 4]>::try_from(buffer)?;
        Ok(u32::from_be_bytes(bytes))
    }
}

/// Appends a length prefixed vector of fixed size items.
pub(crate) fn write_vec<T: FSerializable>(buffer: &mut Vec<u8>, items: &[T]) {
    #[allow(clippy::cast_possible_truncation)]
    let len = items.len() as u32;
    len.ser_into(buffer);
    for item in items {
        item.ser_into(buffer);
    }
}

/// Cursor over a byte buffer used by the manual `VDeserializable` impls.
pub(crate) struct Reader<'a> {
    buffer: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    /// Consumes `len` bytes.
    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.buffer.len() < len {
            return Err(Error::DeserializationError(format!(
                "Unexpected end of buffer: needed {len} bytes, {} left",
                self.buffer.len()
            )));
        }
        let (head, tail) = self.buffer.split_at(len);
        self.buffer = tail;
        Ok(head)
    }

    pub(crate) fn read<T: FSerializable + FDeserializable>(&mut self) -> Result<T, Error> {
        let bytes = self.take(T::size_bytes())?;
        T::deser_f(bytes)
    }

    pub(crate) fn read_vec<T: FSerializable + FDeserializable>(
        &mut self,
    ) -> Result<Vec<T>, Error> {
        let len = usize::try_from(self.read::<u32>()?)?;
        let total = len.checked_mul(T::size_bytes()).ok_or_else(|| {
            Error::DeserializationError("Vector length overflow".to_string())
        })?;
        let bytes = self.take(total)?;

        bytes.chunks_exact(T::size_bytes()).map(T::deser_f).collect()
    }

    /// Fails if unread bytes remain.
    pub(crate) fn finish(self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            Ok(())
        } else {
            Err(Error::DeserializationError(format!(
                "{} trailing bytes",
                self.buffer.len()
            )))
        }
    }
}
