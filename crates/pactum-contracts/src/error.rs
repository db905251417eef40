//! Error taxonomy for the PACTUM fabric.
//!
//! All fallible operations return `PactumResult<T>`. Every variant maps to a
//! stable, namespaced code (`PACK_*`, `POLICY_*`, `FED_*`, `EXEC_*`,
//! `PROTO_*`) and a `recoverable` flag. Trust and integrity failures are
//! never recoverable — a caller must not retry its way past a bad signature
//! or a poisoned blob.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The unified error type for the PACTUM crates.
#[derive(Debug, Error)]
pub enum PactumError {
    /// A pack manifest could not be parsed or failed field validation.
    #[error("invalid pack manifest: {reason}")]
    InvalidManifest { reason: String },

    /// An execution graph violated its structural invariants.
    #[error("invalid execution graph: {reason}")]
    InvalidGraph { reason: String },

    /// A registry index document is malformed or missing mandatory fields.
    ///
    /// The whole index is rejected, never a single entry.
    #[error("invalid registry index: {reason}")]
    InvalidIndex { reason: String },

    /// A pack version string is not valid semver.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A capability id was registered twice.
    #[error("capability '{capability}' is already registered")]
    DuplicateCapability { capability: String },

    /// A pack targets a protocol major the node does not support.
    ///
    /// Raised identically at pack-validation time and at delegation-accept
    /// time, so the two gates can never disagree.
    #[error("pack spec version major {pack_major} does not match supported major {supported_major}")]
    IncompatibleSpecVersion { pack_major: u64, supported_major: u64 },

    /// A handshake challenge was presented after its `expires_at`.
    #[error("challenge expired at {expired_at}")]
    ChallengeExpired { expired_at: String },

    /// A signature failed cryptographic verification.
    #[error("signature verification failed: {reason}")]
    SignatureInvalid { reason: String },

    /// A handshake or delegation referenced a node this node does not know.
    #[error("unknown node '{node_id}'")]
    UnknownNode { node_id: String },

    /// A proof-bundle signature referenced a key id absent from the
    /// trusted-key map.
    #[error("unknown signing key id '{key_id}'")]
    UnknownKeyId { key_id: String },

    /// The peer's advertised policy version differs from the challenge's.
    #[error("policy version mismatch: ours '{ours}', theirs '{theirs}'")]
    PolicyVersionMismatch { ours: String, theirs: String },

    /// The peer's registry snapshot hash differs from ours. Equality is
    /// exact — there is no fuzzy matching across snapshots.
    #[error("registry snapshot mismatch: ours '{ours}', theirs '{theirs}'")]
    SnapshotMismatch { ours: String, theirs: String },

    /// A delegation attempt was driven past its terminal state.
    #[error("delegation attempt already resolved as {state}")]
    AttemptResolved { state: String },

    /// A delegation chain exceeded the node's configured depth ceiling.
    #[error("delegation depth {depth} exceeds maximum {max}")]
    DelegationDepthExceeded { depth: u32, max: u32 },

    /// A blob read back from the CAS no longer hashes to its cid.
    ///
    /// This implies tampering of the underlying store, not malformed input,
    /// and is deliberately distinct from `NotFound`.
    #[error("CAS poisoning detected for cid '{cid}': stored bytes hash to '{actual}'")]
    CasPoisoned { cid: String, actual: String },

    /// A storage key does not exist.
    #[error("key '{key}' not found")]
    NotFound { key: String },

    /// The storage collaborator failed an I/O operation.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A Merkle tree was requested over zero leaves.
    #[error("cannot build a Merkle tree over an empty leaf set")]
    EmptyTree,

    /// A Merkle proof was requested for an out-of-range leaf index.
    #[error("proof index {index} out of range for {leaf_count} leaves")]
    ProofIndex { index: usize, leaf_count: usize },

    /// A float could not enter the canonical value space (NaN or infinite).
    #[error("non-finite number cannot be canonicalized")]
    NonFiniteNumber,

    /// A proof bundle export was attempted with a required digest missing.
    #[error("proof bundle field '{field}' is missing or empty")]
    BundleIncomplete { field: String },

    /// Two input artifacts in a proof bundle export share a name.
    #[error("duplicate input artifact name '{name}'")]
    DuplicateArtifact { name: String },

    /// A signer name did not resolve against the signer registry.
    #[error("no signer registered under name '{name}'")]
    UnknownSigner { name: String },

    /// A signer was asked for an algorithm it does not implement.
    #[error("signer '{signer}' does not support algorithm '{algorithm}'")]
    UnsupportedAlgorithm { signer: String, algorithm: String },

    /// Key material on disk is missing, malformed, or unreadable.
    #[error("key material error: {reason}")]
    KeyMaterial { reason: String },

    /// A policy or node configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the PACTUM crates.
pub type PactumResult<T> = Result<T, PactumError>;

impl PactumError {
    /// The stable, namespaced error code for this variant.
    ///
    /// Codes are part of the wire contract and never change once shipped.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidManifest { .. } => "PACK_INVALID_MANIFEST",
            Self::InvalidGraph { .. } => "PACK_INVALID_GRAPH",
            Self::InvalidIndex { .. } => "PACK_INVALID_INDEX",
            Self::InvalidVersion { .. } => "PACK_INVALID_VERSION",
            Self::DuplicateCapability { .. } => "PACK_DUPLICATE_CAPABILITY",
            Self::IncompatibleSpecVersion { .. } => "FED_INCOMPATIBLE_SPEC_VERSION",
            Self::ChallengeExpired { .. } => "FED_CHALLENGE_EXPIRED",
            Self::SignatureInvalid { .. } => "FED_SIGNATURE_INVALID",
            Self::UnknownNode { .. } => "FED_UNKNOWN_NODE",
            Self::UnknownKeyId { .. } => "FED_UNKNOWN_KEY",
            Self::PolicyVersionMismatch { .. } => "FED_POLICY_VERSION_MISMATCH",
            Self::SnapshotMismatch { .. } => "FED_SNAPSHOT_MISMATCH",
            Self::AttemptResolved { .. } => "FED_ATTEMPT_RESOLVED",
            Self::DelegationDepthExceeded { .. } => "FED_DELEGATION_DEPTH",
            Self::CasPoisoned { .. } => "EXEC_CAS_POISONED",
            Self::NotFound { .. } => "EXEC_NOT_FOUND",
            Self::Storage { .. } => "EXEC_STORAGE",
            Self::EmptyTree => "PROTO_EMPTY_TREE",
            Self::ProofIndex { .. } => "PROTO_PROOF_INDEX",
            Self::NonFiniteNumber => "PROTO_NON_FINITE",
            Self::BundleIncomplete { .. } => "PROTO_BUNDLE_INCOMPLETE",
            Self::DuplicateArtifact { .. } => "PROTO_DUPLICATE_ARTIFACT",
            Self::UnknownSigner { .. } => "EXEC_UNKNOWN_SIGNER",
            Self::UnsupportedAlgorithm { .. } => "EXEC_UNSUPPORTED_ALGORITHM",
            Self::KeyMaterial { .. } => "EXEC_KEY_MATERIAL",
            Self::Config { .. } => "POLICY_CONFIG",
        }
    }

    /// True only for conditions a caller may reasonably retry.
    ///
    /// Trust and integrity failures are always `false`: retrying cannot make
    /// a bad signature good or un-poison a blob.
    pub fn recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Storage { .. })
    }

    /// Project this error into its serializable wire form.
    pub fn to_structured(&self) -> StructuredError {
        let details = match self {
            Self::IncompatibleSpecVersion { pack_major, supported_major } => {
                Some(serde_json::json!({
                    "pack_major": pack_major,
                    "supported_major": supported_major,
                }))
            }
            Self::SnapshotMismatch { ours, theirs }
            | Self::PolicyVersionMismatch { ours, theirs } => {
                Some(serde_json::json!({ "ours": ours, "theirs": theirs }))
            }
            Self::CasPoisoned { cid, actual } => {
                Some(serde_json::json!({ "cid": cid, "actual": actual }))
            }
            Self::DelegationDepthExceeded { depth, max } => {
                Some(serde_json::json!({ "depth": depth, "max": max }))
            }
            _ => None,
        };

        StructuredError {
            code: self.code().to_string(),
            message: self.to_string(),
            details,
            recoverable: self.recoverable(),
        }
    }
}

/// The wire form of a `PactumError`, carried in delegation results and
/// verification reports crossing node boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    /// Namespaced code, e.g. `FED_SNAPSHOT_MISMATCH`.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
    /// Optional machine-readable context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Whether a caller may retry the operation.
    pub recoverable: bool,
}
