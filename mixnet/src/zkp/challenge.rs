// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Challenge generation for the shuffle proof systems
//!
//! Both proof systems need two kinds of challenges: `N` e-values of `ke` bits
//! that batch the permuted vectors, and one Sigma challenge of `kc` bits.
//! [`ChallengeSource`] abstracts where they come from:
//!
//! - [`FiatShamir`]: hashes the transcript, making proofs non-interactive.
//! - [`Interactive`]: asks a live verifier over a channel and blocks for
//!   the answer. The verifier side is a [`ChallengeIssuer`], which records
//!   what it issued so that the proofs can later be checked with
//!   [`IssuedChallenges`].

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use crate::config::{ProofConfig, SecurityParameters};
use crate::context::Context;
use crate::traits::groups::BaseScalar;
use crate::utils::error::Error;
use crate::utils::hash::{self, truncate_to_bits};
use crate::utils::rng::CRng;
use crate::zkp::transcript::Transcript;

use rayon::prelude::*;
use sha3::Digest;

const LOG_TARGET: &str = "mixnet::challenge";

/// Source of e-values and Sigma challenges.
pub trait ChallengeSource<C: Context>: Send + Sync {
    /// The bit lengths challenges are drawn with.
    fn security(&self) -> SecurityParameters;

    /// `count` independent challenges of `ke` bits for the given transcript.
    ///
    /// # Errors
    ///
    /// - `ChallengeChannelClosed`, `UnknownTranscript` for interactive sources
    fn e_values(&self, transcript: &Transcript, count: usize) -> Result<Vec<C::Scalar>, Error>;

    /// One challenge of `kc` bits for the given transcript.
    ///
    /// # Errors
    ///
    /// - `ChallengeChannelClosed`, `UnknownTranscript` for interactive sources
    fn sigma(&self, transcript: &Transcript) -> Result<C::Scalar, Error>;
}

impl<C: Context, S: ChallengeSource<C> + ?Sized> ChallengeSource<C> for &S {
    fn security(&self) -> SecurityParameters {
        (**self).security()
    }

    fn e_values(&self, transcript: &Transcript, count: usize) -> Result<Vec<C::Scalar>, Error> {
        (**self).e_values(transcript, count)
    }

    fn sigma(&self, transcript: &Transcript) -> Result<C::Scalar, Error> {
        (**self).sigma(transcript)
    }
}

/// Embeds the lowest `bits` bits of `bytes` into the scalar field.
pub(crate) fn bounded_scalar<C: Context>(bytes: &[u8], bits: usize) -> C::Scalar {
    C::Scalar::from_le_bytes_mod_order(&truncate_to_bits(bytes, bits))
}

/**
 * Fiat-Shamir challenges: hashes of the transcript and the prover identifier.
 *
 * Identical transcripts under identical configurations always produce
 * identical challenges; changing the prover identifier changes every
 * challenge.
 */
#[derive(Debug, Clone)]
pub struct FiatShamir<C: Context> {
    config: ProofConfig,
    phantom: PhantomData<C>,
}

impl<C: Context> FiatShamir<C> {
    /// Construct a Fiat-Shamir source with the given configuration.
    pub fn new(config: ProofConfig) -> Self {
        Self {
            config,
            phantom: PhantomData,
        }
    }

    /// The configuration of this source.
    pub fn config(&self) -> &ProofConfig {
        &self.config
    }
}

impl<C: Context> Default for FiatShamir<C> {
    fn default() -> Self {
        Self::new(ProofConfig::default())
    }
}

impl<C: Context> ChallengeSource<C> for FiatShamir<C> {
    fn security(&self) -> SecurityParameters {
        self.config.security
    }

    fn e_values(&self, transcript: &Transcript, count: usize) -> Result<Vec<C::Scalar>, Error> {
        let prefix = transcript.digest::<C::Hasher>(b"e_values", &self.config.prover_id);
        let ke = self.config.security.ke;
        let ds_tags: &[&[u8]] = &[b"prefix", b"e_values_counter"];

        let ret = (0..count)
            .into_par_iter()
            .map(|i| {
                let counter = (i as u64).to_be_bytes();
                let mut hasher = C::get_hasher();
                hash::update_hasher(&mut hasher, &[prefix.as_slice(), &counter], ds_tags);
                bounded_scalar::<C>(&hasher.finalize(), ke)
            })
            .collect();

        Ok(ret)
    }

    fn sigma(&self, transcript: &Transcript) -> Result<C::Scalar, Error> {
        let digest = transcript.digest::<C::Hasher>(b"sigma_challenge", &self.config.prover_id);

        Ok(bounded_scalar::<C>(&digest, self.config.security.kc))
    }
}

/// The kind of challenge requested from an interactive verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
    /// A batch of e-values of the given size.
    EValues(usize),
    /// A single Sigma challenge.
    Sigma,
}

impl ChallengeKind {
    fn count(self) -> usize {
        match self {
            ChallengeKind::EValues(count) => count,
            ChallengeKind::Sigma => 1,
        }
    }
}

/// A prover's request for challenges, identified by the transcript fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    /// What is requested.
    pub kind: ChallengeKind,
    /// The fingerprint of the transcript the challenge answers.
    pub fingerprint: Vec<u8>,
}

/// Random bytes answering one request, one entry per requested challenge.
pub type ChallengeReply = Vec<[u8; 32]>;

/// Creates a connected prover side and verifier side for interactive proofs.
///
/// The [`Interactive`] source goes to the prover, the [`ChallengeIssuer`]
/// runs on the verifier's thread and draws challenges from `rng`.
///
/// The issuer answers batches of at most `max_size` e-values, never answers
/// the same e-values transcript twice, and answers exactly one Sigma
/// challenge per e-values batch. A prover can therefore not rewind a proof
/// and pick among several challenges for the same first message.
pub fn interactive<C: Context, R: CRng + Send>(
    security: SecurityParameters,
    max_size: usize,
    rng: R,
) -> (Interactive<C>, ChallengeIssuer<C, R>) {
    let (request_tx, request_rx) = mpsc::channel();
    let (reply_tx, reply_rx) = mpsc::channel();

    let prover = Interactive {
        security,
        requests: request_tx,
        replies: Mutex::new(reply_rx),
        phantom: PhantomData,
    };
    let verifier = ChallengeIssuer {
        security,
        requests: request_rx,
        replies: reply_tx,
        rng,
        max_size,
        open_batches: 0,
        issued: HashMap::new(),
        phantom: PhantomData,
    };

    (prover, verifier)
}

/**
 * Prover side of an interactive challenge exchange.
 *
 * Every challenge request blocks until the connected [`ChallengeIssuer`]
 * answers.
 */
#[derive(Debug)]
pub struct Interactive<C: Context> {
    security: SecurityParameters,
    requests: Sender<ChallengeRequest>,
    replies: Mutex<Receiver<ChallengeReply>>,
    phantom: PhantomData<C>,
}

impl<C: Context> Interactive<C> {
    fn request(&self, kind: ChallengeKind, transcript: &Transcript) -> Result<ChallengeReply, Error> {
        // holding the lock across send and receive keeps replies paired with requests
        let replies = self.replies.lock().map_err(|_| Error::ChallengeChannelClosed)?;

        let request = ChallengeRequest {
            kind,
            fingerprint: transcript.fingerprint::<C::Hasher>(),
        };
        self.requests
            .send(request)
            .map_err(|_| Error::ChallengeChannelClosed)?;
        let reply = replies.recv().map_err(|_| Error::ChallengeChannelClosed)?;

        if reply.is_empty() {
            return Err(Error::ChallengeRefused);
        }
        if reply.len() != kind.count() {
            return Err(Error::DimensionMismatch {
                expected: kind.count(),
                found: reply.len(),
            });
        }
        Ok(reply)
    }
}

impl<C: Context> ChallengeSource<C> for Interactive<C> {
    fn security(&self) -> SecurityParameters {
        self.security
    }

    fn e_values(&self, transcript: &Transcript, count: usize) -> Result<Vec<C::Scalar>, Error> {
        let reply = self.request(ChallengeKind::EValues(count), transcript)?;

        Ok(reply
            .iter()
            .map(|bytes| bounded_scalar::<C>(bytes, self.security.ke))
            .collect())
    }

    fn sigma(&self, transcript: &Transcript) -> Result<C::Scalar, Error> {
        let reply = self.request(ChallengeKind::Sigma, transcript)?;
        let bytes = reply.first().ok_or(Error::ChallengeChannelClosed)?;

        Ok(bounded_scalar::<C>(bytes, self.security.kc))
    }
}

/**
 * Verifier side of an interactive challenge exchange.
 *
 * Answers each [`ChallengeRequest`] with fresh randomness and remembers the
 * answer. Requests that would let the prover see two challenges for one
 * first message are refused with an empty reply. Once the prover is done, [`into_record`][`Self::into_record`]
 * returns the issued challenges for verification.
 */
#[derive(Debug)]
pub struct ChallengeIssuer<C: Context, R: CRng> {
    security: SecurityParameters,
    requests: Receiver<ChallengeRequest>,
    replies: Sender<ChallengeReply>,
    rng: R,
    max_size: usize,
    // e-values batches not yet followed by their Sigma challenge
    open_batches: usize,
    issued: HashMap<(ChallengeKind, Vec<u8>), ChallengeReply>,
    phantom: PhantomData<C>,
}

impl<C: Context, R: CRng> ChallengeIssuer<C, R> {
    fn admit(&mut self, request: &ChallengeRequest) -> bool {
        match request.kind {
            ChallengeKind::EValues(count) => {
                let key = (request.kind, request.fingerprint.clone());
                if count == 0 || count > self.max_size || self.issued.contains_key(&key) {
                    return false;
                }
                self.open_batches += 1;
                true
            }
            ChallengeKind::Sigma => {
                if self.open_batches == 0 {
                    return false;
                }
                self.open_batches -= 1;
                true
            }
        }
    }

    /// Answer the next request.
    ///
    /// Returns `Ok(false)` once the prover side has been dropped.
    ///
    /// # Errors
    ///
    /// - `ChallengeChannelClosed` if the prover stopped listening for the answer
    /// - `ChallengeRefused` if the request was refused; the prover receives
    ///   an empty reply
    pub fn serve_one(&mut self) -> Result<bool, Error> {
        let Ok(request) = self.requests.recv() else {
            return Ok(false);
        };

        if !self.admit(&request) {
            tracing::debug!(target: LOG_TARGET, kind = ?request.kind, "refusing challenge request");
            self.replies
                .send(Vec::new())
                .map_err(|_| Error::ChallengeChannelClosed)?;
            return Err(Error::ChallengeRefused);
        }

        let reply: ChallengeReply = (0..request.kind.count())
            .map(|_| {
                let mut bytes = [0u8; 32];
                self.rng.fill_bytes(&mut bytes);
                bytes
            })
            .collect();
        tracing::debug!(target: LOG_TARGET, kind = ?request.kind, "issuing challenge");

        self.issued
            .insert((request.kind, request.fingerprint), reply.clone());
        self.replies
            .send(reply)
            .map_err(|_| Error::ChallengeChannelClosed)?;

        Ok(true)
    }

    /// Answer requests until the prover side is dropped, then return the
    /// issued challenges.
    ///
    /// # Errors
    ///
    /// - `ChallengeChannelClosed` if the prover stopped listening for an answer
    /// - `ChallengeRefused` if the prover sent a request that was refused
    pub fn serve(mut self) -> Result<IssuedChallenges<C>, Error> {
        while self.serve_one()? {}

        Ok(self.into_record())
    }

    /// The challenges issued so far.
    pub fn into_record(self) -> IssuedChallenges<C> {
        IssuedChallenges {
            security: self.security,
            issued: self.issued,
            phantom: PhantomData,
        }
    }
}

/**
 * Challenges issued during an interactive proof, replayed for verification.
 *
 * Transcripts that were never answered yield `UnknownTranscript`, which the
 * proof systems treat as a rejected proof.
 */
#[derive(Debug, Clone)]
pub struct IssuedChallenges<C: Context> {
    security: SecurityParameters,
    issued: HashMap<(ChallengeKind, Vec<u8>), ChallengeReply>,
    phantom: PhantomData<C>,
}

impl<C: Context> IssuedChallenges<C> {
    fn lookup(&self, kind: ChallengeKind, transcript: &Transcript) -> Result<&ChallengeReply, Error> {
        let key = (kind, transcript.fingerprint::<C::Hasher>());

        self.issued.get(&key).ok_or(Error::UnknownTranscript)
    }

    /// The number of answered requests.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Check if no challenge was issued.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

impl<C: Context> ChallengeSource<C> for IssuedChallenges<C> {
    fn security(&self) -> SecurityParameters {
        self.security
    }

    fn e_values(&self, transcript: &Transcript, count: usize) -> Result<Vec<C::Scalar>, Error> {
        let reply = self.lookup(ChallengeKind::EValues(count), transcript)?;

        Ok(reply
            .iter()
            .map(|bytes| bounded_scalar::<C>(bytes, self.security.ke))
            .collect())
    }

    fn sigma(&self, transcript: &Transcript) -> Result<C::Scalar, Error> {
        let reply = self.lookup(ChallengeKind::Sigma, transcript)?;
        let bytes = reply.first().ok_or(Error::UnknownTranscript)?;

        Ok(bounded_scalar::<C>(bytes, self.security.kc))
    }
}
