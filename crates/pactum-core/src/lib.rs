//! # pactum-core
//!
//! The determinism core of the PACTUM fabric:
//!
//! - canonical JSON serialization + SHA-256 hashing (`canonical`)
//! - Merkle trees and inclusion proofs (`merkle`)
//! - the storage collaborator trait and reference stores (`store`)
//! - the content-addressed store with read-time integrity (`cas`)
//!
//! Everything else in the workspace hashes against this crate. The
//! canonicalization contract is frozen and verified by golden fixtures —
//! equivalence with other implementations is proven by shared
//! `(canonical-input, expected-digest)` pairs, never inferred from review.

pub mod canonical;
pub mod cas;
pub mod merkle;
pub mod store;

pub use canonical::{canonical_json, hash_bytes, hash_value, is_hex_digest};
pub use cas::Cas;
pub use merkle::{MerkleProof, MerkleTree};
pub use store::{FsStore, MemoryStore, Storage};
