// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Error type shared by the mixer, commitment scheme and proof systems.
//!
//! Invalid proofs are not errors: verification functions return `Ok(false)`.
//! The variants below cover malformed inputs, invalid parameters and
//! failures of the underlying curve libraries.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input vectors do not have the length the operation was configured for.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The configured size
        expected: usize,
        /// The size of the offending input
        found: usize,
    },

    /// Two proof systems were set up with different commitment generators.
    #[error("Commitment generator {index} differs between proof systems")]
    GeneratorMismatch {
        /// Position of the first differing generator
        index: usize,
    },

    /// Shuffles require at least one ciphertext.
    #[error("Empty shuffle")]
    EmptyShuffle,

    /// The supplied indices do not form a bijection.
    #[error("Invalid permutation")]
    InvalidPermutation,

    /// Challenge and randomness bit lengths do not fit the group order.
    #[error("Invalid security parameters: {0}")]
    InvalidSecurityParameters(String),

    /// A group operation of the curve backend failed.
    #[error("Group operation failed: {0}")]
    GroupOperation(String),

    /// The interactive verifier hung up before answering a challenge request.
    #[error("Challenge channel closed")]
    ChallengeChannelClosed,

    /// The interactive verifier refused to answer a challenge request.
    #[error("Challenge request refused")]
    ChallengeRefused,

    /// No challenge was issued for the given transcript.
    #[error("No challenge was issued for this transcript")]
    UnknownTranscript,

    /// Bytes could not be parsed into the requested type.
    #[error("{0}")]
    DeserializationError(String),
}

impl From<p256::elliptic_curve::Error> for Error {
    fn from(e: p256::elliptic_curve::Error) -> Self {
        Error::GroupOperation(e.to_string())
    }
}

impl From<std::array::TryFromSliceError> for Error {
    fn from(e: std::array::TryFromSliceError) -> Self {
        Error::DeserializationError(e.to_string())
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(e: std::num::TryFromIntError) -> Self {
        Error::DeserializationError(e.to_string())
    }
}
