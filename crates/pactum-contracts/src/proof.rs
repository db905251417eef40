//! Proof bundle types.
//!
//! A proof bundle is the self-contained artifact a completed run exports so
//! any third party can verify it later without re-executing the run. The
//! `fingerprint` is the canonical hash of the bundle with `fingerprint` and
//! `signature` removed, so a signature may be attached after export without
//! invalidating the fingerprint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named input artifact and its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDigest {
    /// Artifact name; the exporter sorts artifacts by this field.
    pub name: String,
    /// Lowercase 64-char hex digest of the artifact bytes.
    pub sha256: String,
}

/// A detached signature over a bundle's fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSignature {
    /// Signature algorithm, e.g. "ed25519".
    pub algorithm: String,
    /// Key id resolvable against the verifier's trusted-key map.
    pub key_id: String,
    /// Hex-encoded signature bytes.
    pub signature: String,
}

/// The self-contained, independently verifiable record of a completed run.
///
/// Created once at export and immutable afterwards; any digest mutation
/// without recomputing `fingerprint` is detected by the verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofBundle {
    /// Bundle format version, e.g. "1.0.0".
    pub version: String,
    /// Canonical hash of this bundle excluding `fingerprint`/`signature`.
    pub fingerprint: String,
    /// Merkle root over the run's declared artifacts.
    pub merkle_root: String,
    /// Digests of every input artifact, sorted by name.
    pub input_artifact_digests: Vec<ArtifactDigest>,
    /// Digest of the run's output.
    pub output_digest: String,
    /// Digest of the policy the run was authorized under.
    pub policy_digest: String,
    /// Digest of the execution transcript.
    pub transcript_digest: String,
    /// Version of the engine that produced the run.
    pub engine_version: String,
    /// Protocol version in force at run time.
    pub protocol_version: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<BundleSignature>,
}
