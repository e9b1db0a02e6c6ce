// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Proof system configuration

use crate::context::Context;
use crate::traits::groups::CryptographicGroup;
use crate::utils::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default bit length of the e-values, the Sigma challenge and the
/// statistical hiding slack.
pub const DEFAULT_SECURITY_BITS: usize = 80;

/**
 * Bit lengths governing soundness and zero knowledge of the shuffle proofs.
 *
 * - `ke`: bit length of each e-value used to batch the `N` ciphertexts
 * - `kc`: bit length of the Sigma challenge
 * - `kr`: statistical distance parameter for the bounded masks
 *
 * The masks `epsilon_i` are drawn from `[0, 2^(ke + kc + kr))`, so the sum
 * `ke + kc + kr` plus two bits of headroom must fit below the group order.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SecurityParameters {
    /// e-value bit length
    pub ke: usize,
    /// challenge bit length
    pub kc: usize,
    /// statistical slack bit length
    pub kr: usize,
}

impl SecurityParameters {
    /// Construct security parameters with the given bit lengths.
    #[must_use]
    pub fn new(ke: usize, kc: usize, kr: usize) -> Self {
        Self { ke, kc, kr }
    }

    /// Bit length of the bounded masks, `ke + kc + kr`.
    #[must_use]
    pub fn mask_bits(&self) -> usize {
        self.ke + self.kc + self.kr
    }

    /// Checks that these parameters are usable in the group of context `C`.
    ///
    /// # Errors
    ///
    /// - `InvalidSecurityParameters` if a bit length is zero or if
    ///   `ke + kc + kr + 2` exceeds the bit length of the group order
    pub fn validate<C: Context>(&self) -> Result<(), Error> {
        if self.ke == 0 || self.kc == 0 || self.kr == 0 {
            return Err(Error::InvalidSecurityParameters(format!(
                "bit lengths must be positive (ke = {}, kc = {}, kr = {})",
                self.ke, self.kc, self.kr
            )));
        }
        let order_bits = <C::G as CryptographicGroup>::ORDER_BITS;
        let needed = self.mask_bits().saturating_add(2);
        if needed > order_bits {
            return Err(Error::InvalidSecurityParameters(format!(
                "ke + kc + kr + 2 = {needed} exceeds the {order_bits} bit group order"
            )));
        }

        Ok(())
    }
}

impl Default for SecurityParameters {
    fn default() -> Self {
        Self::new(
            DEFAULT_SECURITY_BITS,
            DEFAULT_SECURITY_BITS,
            DEFAULT_SECURITY_BITS,
        )
    }
}

/**
 * Configuration shared by prover and verifier of a proof system.
 *
 * Both sides must use identical values: a proof generated under one
 * configuration does not verify under another.
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProofConfig {
    /// Challenge and randomness bit lengths.
    pub security: SecurityParameters,
    /// Identifier of the prover, bound into every Fiat-Shamir challenge.
    pub prover_id: Vec<u8>,
}

impl ProofConfig {
    /// Construct a configuration with the given parameters and prover identifier.
    pub fn new(security: SecurityParameters, prover_id: impl Into<Vec<u8>>) -> Self {
        Self {
            security,
            prover_id: prover_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::P256Ctx as PCtx;
    use crate::context::RistrettoCtx as RCtx;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SecurityParameters::default().validate::<RCtx>().is_ok());
        assert!(SecurityParameters::default().validate::<PCtx>().is_ok());
        assert!(SecurityParameters::new(60, 60, 20).validate::<RCtx>().is_ok());
    }

    #[test]
    fn test_oversized_parameters() {
        // 251 + 2 = 253 fits Ristretto exactly
        assert!(SecurityParameters::new(100, 100, 51).validate::<RCtx>().is_ok());
        assert!(matches!(
            SecurityParameters::new(100, 100, 52).validate::<RCtx>(),
            Err(Error::InvalidSecurityParameters(_))
        ));
        assert!(SecurityParameters::new(100, 100, 52).validate::<PCtx>().is_ok());
        assert!(SecurityParameters::new(100, 100, 55).validate::<PCtx>().is_err());
        assert!(SecurityParameters::new(0, 80, 80).validate::<PCtx>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde() {
        let config = ProofConfig::new(SecurityParameters::new(60, 60, 20), "Shuffler");
        let json = serde_json::to_string(&config).unwrap();
        let back: ProofConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, back);
    }
}
