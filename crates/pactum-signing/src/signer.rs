//! The `Signer` trait and signature algorithm identifiers.
//!
//! Signers are resolved by name from a `SignerRegistry` at use time rather
//! than held as fixed references, so key material can rotate underneath
//! long-lived components.

use std::fmt;
use std::str::FromStr;

use pactum_contracts::error::{PactumError, PactumResult};

/// The signature algorithms the fabric knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// Ed25519 over raw message bytes.
    Ed25519,
    /// The no-op algorithm. Test-only, never production trust.
    Null,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "ed25519"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = PactumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(Self::Ed25519),
            "null" => Ok(Self::Null),
            other => Err(PactumError::UnsupportedAlgorithm {
                signer: "-".to_string(),
                algorithm: other.to_string(),
            }),
        }
    }
}

/// A pluggable signer.
///
/// Implementations are trusted components. They must be deterministic for a
/// fixed key and must never sign under an algorithm they did not advertise.
pub trait Signer: fmt::Debug + Send + Sync {
    /// Stable signer name used for registry resolution.
    fn name(&self) -> &str;

    /// Every algorithm this signer can sign and verify with.
    fn supported_algorithms(&self) -> Vec<SignatureAlgorithm>;

    /// Sign `data` under `algorithm`, returning raw signature bytes.
    fn sign(&self, data: &[u8], algorithm: SignatureAlgorithm) -> PactumResult<Vec<u8>>;

    /// Verify `signature` over `data` under `algorithm`.
    ///
    /// Returns `Ok(false)` for a well-formed but non-matching signature;
    /// `Err` only for malformed inputs or unsupported algorithms.
    fn verify(
        &self,
        data: &[u8],
        signature: &[u8],
        algorithm: SignatureAlgorithm,
    ) -> PactumResult<bool>;
}
