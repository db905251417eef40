//! Content-addressed store over any `Storage` backend.
//!
//! A blob's address is the SHA-256 of its bytes. Integrity is checked on
//! every read, not only at write time: `retrieve` re-hashes the returned
//! bytes and raises a poisoning error if the recomputed hash differs from
//! the cid, even though the underlying read succeeded.

use tracing::{debug, warn};

use pactum_contracts::error::{PactumError, PactumResult};

use crate::canonical::hash_bytes;
use crate::store::Storage;

/// A content-addressed store.
pub struct Cas<S: Storage> {
    backend: S,
}

impl<S: Storage> Cas<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Store `bytes` and return their cid.
    ///
    /// Storing identical bytes twice is a no-op at the same address.
    pub fn store(&self, bytes: &[u8]) -> PactumResult<String> {
        let cid = hash_bytes(bytes);
        self.backend.write(&cid, bytes)?;
        debug!(cid = %cid, size = bytes.len(), "blob stored");
        Ok(cid)
    }

    /// Retrieve the blob at `cid`, verifying its content hash.
    ///
    /// A mismatch is `EXEC_CAS_POISONED` — tampering of the backing store,
    /// deliberately distinct from `EXEC_NOT_FOUND`.
    pub fn retrieve(&self, cid: &str) -> PactumResult<Vec<u8>> {
        let bytes = self.backend.read(cid)?;
        let actual = hash_bytes(&bytes);
        if actual != cid {
            warn!(cid = %cid, actual = %actual, "CAS poisoning detected");
            return Err(PactumError::CasPoisoned {
                cid: cid.to_string(),
                actual,
            });
        }
        Ok(bytes)
    }

    /// All cids currently stored, sorted.
    pub fn list(&self) -> PactumResult<Vec<String>> {
        self.backend.list("")
    }

    /// Borrow the backing store.
    pub fn backend(&self) -> &S {
        &self.backend
    }
}
