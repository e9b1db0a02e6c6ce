// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Public key cryptosystems
//!
//! # [`elgamal`]
//!
//! ElGamal encryption with re-encryption, over messages of arbitrary width.

/// ElGamal encryption with re-encryption.
pub mod elgamal;
