// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Prime-order groups the mixnet runs over
//!
//! - [`ristretto255`]: the Ristretto group over curve25519, from `curve25519-dalek`.
//! - [`p256`]: NIST P-256, from the RustCrypto `p256` crate.
//! - [`productgroup`]: `[T; W]` arrays of elements or scalars, the shape of
//!   width-`W` ciphertext components, with component-wise, replicated and
//!   distributed operations.
//!
//! # Examples
//!
//! Re-encrypting a width 3 ciphertext `(u, v)` under public key `y` with
//! randomness `s` multiplies `u` by `g^s` and `v` by `y^s`, component-wise:
//!
//! ```
//! use mixnet::context::Context;
//! use mixnet::context::RistrettoCtx as Ctx;
//! use mixnet::groups::ristretto255::{RistrettoElement, RistrettoScalar};
//! use mixnet::traits::groups::{GroupElement, GroupScalar, ReplGroupOps};
//!
//! let mut rng = Ctx::get_rng();
//! let y = Ctx::random_element();
//! let u = <[RistrettoElement; 3]>::random(&mut rng);
//! let v = <[RistrettoElement; 3]>::random(&mut rng);
//! let s = <[RistrettoScalar; 3]>::random(&mut rng);
//!
//! let u_prime = u.mul(&Ctx::generator().repl_exp(&s));
//! let v_prime = v.mul(&y.repl_exp(&s));
//!
//! // undoing the randomization restores the ciphertext
//! assert_eq!(u_prime.mul(&Ctx::generator().repl_exp(&s.neg())), u);
//! assert_eq!(v_prime.mul(&y.repl_exp(&s).inv()), v);
//! ```

/// NIST P-256.
pub mod p256;

/// Products `[T; W]` of elements and scalars.
pub mod productgroup;

/// The Ristretto group over curve25519.
pub mod ristretto255;

pub use p256::P256Group;
pub use ristretto255::Ristretto255Group;
