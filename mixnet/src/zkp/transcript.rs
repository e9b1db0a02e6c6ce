// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Proof transcripts

use crate::utils::hash::{self, Hasher};

/**
 * An ordered record of the public values a challenge depends on.
 *
 * Each entry carries a domain separation tag. Challenges are derived only
 * from a transcript, so anything that is not appended cannot influence them.
 *
 * # Examples
 *
 * ```
 * use mixnet::utils::hash::Hasher512;
 * use mixnet::zkp::transcript::Transcript;
 *
 * let mut t1 = Transcript::new(b"protocol");
 * t1.append(b"x", vec![1, 2, 3]);
 * let t2 = Transcript::new(b"protocol").with(b"x", vec![1, 2]);
 *
 * assert_ne!(t1.fingerprint::<Hasher512>(), t2.fingerprint::<Hasher512>());
 * ```
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    protocol: &'static [u8],
    entries: Vec<(&'static [u8], Vec<u8>)>,
}

impl Transcript {
    /// Start a transcript for the given protocol label.
    #[must_use]
    pub fn new(protocol: &'static [u8]) -> Self {
        Self {
            protocol,
            entries: vec![],
        }
    }

    /// Append a tagged value.
    pub fn append(&mut self, tag: &'static [u8], bytes: Vec<u8>) {
        self.entries.push((tag, bytes));
    }

    /// Append a tagged value, by value.
    #[must_use]
    pub fn with(mut self, tag: &'static [u8], bytes: Vec<u8>) -> Self {
        self.append(tag, bytes);
        self
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries were appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hashes the protocol label, all entries, the `prover_id` and the
    /// `purpose` of the digest.
    #[must_use]
    pub fn digest<H: Hasher>(&self, purpose: &[u8], prover_id: &[u8]) -> Vec<u8> {
        let mut inputs: Vec<&[u8]> = Vec::with_capacity(self.entries.len() + 3);
        let mut tags: Vec<&[u8]> = Vec::with_capacity(self.entries.len() + 3);

        inputs.push(self.protocol);
        tags.push(b"protocol");
        for (tag, bytes) in &self.entries {
            inputs.push(bytes);
            tags.push(tag);
        }
        inputs.push(prover_id);
        tags.push(b"prover_id");
        inputs.push(purpose);
        tags.push(b"purpose");

        let mut hasher = H::hasher();
        hash::update_hasher(&mut hasher, &inputs, &tags);
        hasher.finalize().to_vec()
    }

    /// A digest identifying this transcript, independent of any prover.
    #[must_use]
    pub fn fingerprint<H: Hasher>(&self) -> Vec<u8> {
        self.digest::<H>(b"fingerprint", b"")
    }
}
