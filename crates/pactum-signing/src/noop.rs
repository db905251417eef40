//! The no-op signer.
//!
//! Produces a deterministic empty signature and "verifies" any non-empty
//! input. Useful for wiring tests and dry runs; it must never back
//! production trust, which is why it only advertises the `Null` algorithm.

use pactum_contracts::error::{PactumError, PactumResult};

use crate::signer::{SignatureAlgorithm, Signer};

/// A signer that signs nothing and trusts everything non-empty.
#[derive(Debug, Default)]
pub struct NoopSigner;

impl NoopSigner {
    pub fn new() -> Self {
        Self
    }
}

impl Signer for NoopSigner {
    fn name(&self) -> &str {
        "noop"
    }

    fn supported_algorithms(&self) -> Vec<SignatureAlgorithm> {
        vec![SignatureAlgorithm::Null]
    }

    fn sign(&self, _data: &[u8], algorithm: SignatureAlgorithm) -> PactumResult<Vec<u8>> {
        if algorithm != SignatureAlgorithm::Null {
            return Err(PactumError::UnsupportedAlgorithm {
                signer: self.name().to_string(),
                algorithm: algorithm.to_string(),
            });
        }
        Ok(Vec::new())
    }

    fn verify(
        &self,
        data: &[u8],
        _signature: &[u8],
        algorithm: SignatureAlgorithm,
    ) -> PactumResult<bool> {
        if algorithm != SignatureAlgorithm::Null {
            return Err(PactumError::UnsupportedAlgorithm {
                signer: self.name().to_string(),
                algorithm: algorithm.to_string(),
            });
        }
        Ok(!data.is_empty())
    }
}
