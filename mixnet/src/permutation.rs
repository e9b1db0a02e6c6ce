// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Permutations in one-line notation
//!
//! A permutation `p` of size `N` maps output positions to input positions:
//! applying `p` to `x` yields `y` with `y[j] = x[p[j]]`. The mixer, the
//! permutation commitment and both proof systems use this convention.

use crate::context::Context;
use crate::utils::error::Error;
use crate::utils::rng::CRng;

use rand::Rng;

/**
 * A bijection on `{0, .., N - 1}` together with its inverse.
 *
 * # Examples
 *
 * ```
 * use mixnet::permutation::Permutation;
 *
 * let p = Permutation::new(vec![2, 0, 1]).unwrap();
 * let data = vec!['a', 'b', 'c'];
 *
 * let permuted = p.apply(&data).unwrap();
 * assert_eq!(permuted, vec!['c', 'a', 'b']);
 *
 * let restored = p.apply_inverse(&permuted).unwrap();
 * assert_eq!(restored, data);
 * ```
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    permutation: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Construct a permutation from its one-line notation.
    ///
    /// # Errors
    ///
    /// - `InvalidPermutation` if the indices are not a bijection on `0..len`
    pub fn new(permutation: Vec<usize>) -> Result<Self, Error> {
        let size = permutation.len();
        let mut inverse = vec![usize::MAX; size];

        for (j, &i) in permutation.iter().enumerate() {
            match inverse.get_mut(i) {
                Some(slot) if *slot == usize::MAX => *slot = j,
                _ => return Err(Error::InvalidPermutation),
            }
        }

        Ok(Self {
            permutation,
            inverse,
        })
    }

    /// The identity permutation of the given size.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let permutation: Vec<usize> = (0..size).collect();
        Self {
            inverse: permutation.clone(),
            permutation,
        }
    }

    /// Generate a uniformly random permutation with the given rng.
    ///
    /// Uses the Fisher-Yates shuffle; every permutation of `size` elements is
    /// equally likely.
    pub fn random<R: CRng>(size: usize, rng: &mut R) -> Self {
        let mut permutation: Vec<usize> = (0..size).collect();
        for i in (1..size).rev() {
            let j = rng.gen_range(0..=i);
            permutation.swap(i, j);
        }

        let mut inverse = vec![0usize; size];
        for (j, &i) in permutation.iter().enumerate() {
            inverse[i] = j;
        }

        Self {
            permutation,
            inverse,
        }
    }

    /// Generate a uniformly random permutation with the rng of context `C`.
    #[must_use]
    pub fn generate<C: Context>(size: usize) -> Self {
        let mut rng = C::get_rng();
        Self::random(size, &mut rng)
    }

    /// The size of the permutation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    /// Check if this is the empty permutation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// The input position that output position `j` is taken from, `p[j]`.
    #[must_use]
    pub fn get(&self, j: usize) -> Option<usize> {
        self.permutation.get(j).copied()
    }

    /// The one-line notation.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.permutation
    }

    /// The one-line notation of the inverse, `p^-1`.
    #[must_use]
    pub fn inverse_slice(&self) -> &[usize] {
        &self.inverse
    }

    /// The inverse permutation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            permutation: self.inverse.clone(),
            inverse: self.permutation.clone(),
        }
    }

    /// The permutation equivalent to applying `self` and then `other`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the sizes differ
    pub fn compose(&self, other: &Permutation) -> Result<Self, Error> {
        if other.len() != self.len() {
            return Err(Error::DimensionMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        // (x . self . other)[k] = (x . self)[other[k]] = x[self[other[k]]]
        let permutation = other.permutation.iter().map(|&k| self.permutation[k]).collect();

        Self::new(permutation)
    }

    /// Apply the permutation: returns `y` with `y[j] = target[p[j]]`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the target length does not match the permutation length
    pub fn apply<T: Clone>(&self, target: &[T]) -> Result<Vec<T>, Error> {
        Ok(self.apply_refs(target)?.into_iter().cloned().collect())
    }

    /// Like [`apply`][`Self::apply`], without cloning.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the target length does not match the permutation length
    pub fn apply_refs<'a, T>(&self, target: &'a [T]) -> Result<Vec<&'a T>, Error> {
        Self::permute(&self.permutation, target)
    }

    /// Apply the inverse permutation: returns `x` with `x[p[j]] = target[j]`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the target length does not match the permutation length
    pub fn apply_inverse<T: Clone>(&self, target: &[T]) -> Result<Vec<T>, Error> {
        Ok(Self::permute(&self.inverse, target)?.into_iter().cloned().collect())
    }

    fn permute<'a, T>(indices: &[usize], target: &'a [T]) -> Result<Vec<&'a T>, Error> {
        if target.len() != indices.len() {
            return Err(Error::DimensionMismatch {
                expected: indices.len(),
                found: target.len(),
            });
        }

        Ok(indices.iter().map(|&i| &target[i]).collect())
    }
}
