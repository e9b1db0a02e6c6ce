// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Verifiable re-encryption mixnet

#![doc = include_str!("../README.md")]

/// Permutation commitments.
pub mod commitment;
/// Security parameters and proof configuration.
pub mod config;
/// Defines implementation choices for key cryptographic functionalities.
pub mod context;
pub mod cryptosystem;
pub mod groups;
/// Re-encryption mixing of ciphertext batches.
pub mod mixer;
/// Permutations of `0..N`.
pub mod permutation;
/// Abstractions for curve arithmetic, groups, elements and scalars.
pub mod traits;
/// Utilities such as random number generation, hashing, errors and serialization.
pub mod utils;
pub mod zkp;

pub use utils::Error;
