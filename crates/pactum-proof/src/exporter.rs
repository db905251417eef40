//! Proof bundle export.
//!
//! Export happens once, at the end of a run: required digests are checked,
//! input artifacts are sorted by name, and the fingerprint is computed over
//! the canonical bundle with `fingerprint` and `signature` removed. A
//! signature may be attached afterwards without invalidating the
//! fingerprint, because the field is excluded from hashing.

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use pactum_contracts::error::{PactumError, PactumResult};
use pactum_contracts::proof::{ArtifactDigest, BundleSignature, ProofBundle};
use pactum_core::canonical::hash_value;
use pactum_signing::{SignatureAlgorithm, SignerRegistry};

/// The bundle format version this exporter writes.
pub const BUNDLE_VERSION: &str = "1.0.0";

/// Everything a completed run hands the exporter.
#[derive(Debug, Clone)]
pub struct ExportParams {
    pub merkle_root: String,
    pub input_artifact_digests: Vec<ArtifactDigest>,
    pub output_digest: String,
    pub policy_digest: String,
    pub transcript_digest: String,
    pub engine_version: String,
    pub protocol_version: String,
    pub run_id: Option<Uuid>,
}

/// Compute a bundle's fingerprint: the canonical hash of the bundle with
/// `fingerprint` and `signature` removed.
pub fn fingerprint_of(bundle: &ProofBundle) -> String {
    let mut value =
        serde_json::to_value(bundle).expect("a ProofBundle is always serializable");
    if let Value::Object(map) = &mut value {
        map.remove("fingerprint");
        map.remove("signature");
    }
    hash_value(&value)
}

/// Export a proof bundle.
///
/// Fails with `PROTO_BUNDLE_INCOMPLETE` naming the first missing digest and
/// with `PROTO_DUPLICATE_ARTIFACT` on a repeated artifact name, so every
/// bundle this function seals passes its own verifier. Otherwise sorts
/// artifacts by name, stamps `created_at`, and seals the fingerprint.
pub fn export(params: ExportParams) -> PactumResult<ProofBundle> {
    for (field, value) in [
        ("merkleRoot", &params.merkle_root),
        ("outputDigest", &params.output_digest),
        ("policyDigest", &params.policy_digest),
        ("transcriptDigest", &params.transcript_digest),
    ] {
        if value.trim().is_empty() {
            return Err(PactumError::BundleIncomplete { field: field.to_string() });
        }
    }

    let mut artifacts = params.input_artifact_digests;
    artifacts.sort_by(|a, b| a.name.cmp(&b.name));
    if let Some(pair) = artifacts.windows(2).find(|w| w[0].name == w[1].name) {
        return Err(PactumError::DuplicateArtifact { name: pair[0].name.clone() });
    }

    let mut bundle = ProofBundle {
        version: BUNDLE_VERSION.to_string(),
        fingerprint: String::new(),
        merkle_root: params.merkle_root,
        input_artifact_digests: artifacts,
        output_digest: params.output_digest,
        policy_digest: params.policy_digest,
        transcript_digest: params.transcript_digest,
        engine_version: params.engine_version,
        protocol_version: params.protocol_version,
        created_at: Utc::now(),
        run_id: params.run_id,
        signature: None,
    };
    bundle.fingerprint = fingerprint_of(&bundle);

    info!(
        fingerprint = %bundle.fingerprint,
        artifacts = bundle.input_artifact_digests.len(),
        "proof bundle exported"
    );
    Ok(bundle)
}

/// Sign an exported bundle's fingerprint and attach the signature.
///
/// The signer is resolved by name at call time, so key material can rotate
/// between export and signing. The fingerprint is untouched.
pub fn attach_signature(
    bundle: &mut ProofBundle,
    signers: &SignerRegistry,
    signer_name: &str,
    key_id: &str,
    algorithm: SignatureAlgorithm,
) -> PactumResult<()> {
    let signer = signers.resolve(signer_name)?;
    let signature = signer.sign(bundle.fingerprint.as_bytes(), algorithm)?;
    bundle.signature = Some(BundleSignature {
        algorithm: algorithm.to_string(),
        key_id: key_id.to_string(),
        signature: hex::encode(signature),
    });
    Ok(())
}
