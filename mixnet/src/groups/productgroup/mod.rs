// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Generic product groups for elements and scalars
//!
//! A ciphertext of width `W` lives in the product group `[T; W]`; all group
//! laws apply component-wise.

/// Product group for elements
pub mod element;

/// Product group for scalars
pub mod scalar;
