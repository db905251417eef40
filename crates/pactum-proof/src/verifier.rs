//! The five-stage proof bundle verifier.
//!
//! Verification never re-executes the run. The five steps run in order and
//! short-circuit on the first failure, each with a distinct exit code:
//!
//! 1. **schema** — required fields present; digest fields are 64-char hex.
//!    The Merkle root's own syntactic check is deferred to step 3, which
//!    owns it.
//! 2. **fingerprint** — recomputed fingerprint equals the stored value.
//! 3. **merkle** — the root is a syntactically valid digest.
//! 4. **internal consistency** — artifacts are sorted and unique by name,
//!    no digest is empty, and the derived cross-hash is computable. The
//!    cross-hash is not persisted in the bundle (persisting it would break
//!    the fingerprint invariant or be unverifiable), so computability is
//!    the enforced property.
//! 5. **signature**, if present — key id resolved against the trusted-key
//!    map; the signature must verify over the fingerprint bytes.
//!
//! Exit code 6 (file I/O) belongs to the CLI layer, which reads bundles
//! from disk before handing them here.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::{debug, warn};

use pactum_contracts::proof::ProofBundle;
use pactum_core::canonical::{hash_value, is_hex_digest};
use pactum_signing::verify_ed25519;

use crate::exporter::fingerprint_of;

/// The verification stage a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStep {
    Schema,
    Fingerprint,
    Merkle,
    Consistency,
    Signature,
}

impl VerifyStep {
    /// The process exit code this step maps to.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Schema => 1,
            Self::Fingerprint => 2,
            Self::Merkle => 3,
            Self::Consistency => 4,
            Self::Signature => 5,
        }
    }
}

/// The verifier's atomic pass/fail outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    /// The failing step; `None` on success.
    pub step: Option<VerifyStep>,
    /// Human-readable failure description; `None` on success.
    pub error: Option<String>,
}

impl Verdict {
    fn pass() -> Self {
        Self { valid: true, step: None, error: None }
    }

    fn fail(step: VerifyStep, error: impl Into<String>) -> Self {
        let error = error.into();
        warn!(step = ?step, %error, "proof bundle verification failed");
        Self { valid: false, step: Some(step), error: Some(error) }
    }

    /// 0 on success, otherwise the failing step's exit code.
    pub fn exit_code(&self) -> i32 {
        match self.step {
            None => 0,
            Some(step) => step.exit_code(),
        }
    }
}

/// Verify a proof bundle against a map of trusted key ids → hex public
/// keys. An unsigned bundle passes through step 4 and skips step 5.
pub fn verify_bundle(bundle: &ProofBundle, trusted_keys: &BTreeMap<String, String>) -> Verdict {
    // ── Step 1: schema ───────────────────────────────────────────────────────
    if bundle.version.trim().is_empty() {
        return Verdict::fail(VerifyStep::Schema, "bundle 'version' is empty");
    }
    if bundle.engine_version.trim().is_empty() {
        return Verdict::fail(VerifyStep::Schema, "bundle 'engineVersion' is empty");
    }
    if bundle.protocol_version.trim().is_empty() {
        return Verdict::fail(VerifyStep::Schema, "bundle 'protocolVersion' is empty");
    }
    if bundle.merkle_root.trim().is_empty() {
        return Verdict::fail(VerifyStep::Schema, "bundle 'merkleRoot' is missing");
    }
    for (field, digest) in [
        ("fingerprint", &bundle.fingerprint),
        ("outputDigest", &bundle.output_digest),
        ("policyDigest", &bundle.policy_digest),
        ("transcriptDigest", &bundle.transcript_digest),
    ] {
        if !is_hex_digest(digest) {
            return Verdict::fail(
                VerifyStep::Schema,
                format!("'{}' is not a 64-char lowercase hex digest", field),
            );
        }
    }
    for artifact in &bundle.input_artifact_digests {
        if artifact.name.trim().is_empty() {
            return Verdict::fail(VerifyStep::Schema, "input artifact with empty name");
        }
        if !is_hex_digest(&artifact.sha256) {
            return Verdict::fail(
                VerifyStep::Schema,
                format!("artifact '{}' digest is not 64-char hex", artifact.name),
            );
        }
    }

    // ── Step 2: fingerprint ──────────────────────────────────────────────────
    let recomputed = fingerprint_of(bundle);
    if recomputed != bundle.fingerprint {
        return Verdict::fail(
            VerifyStep::Fingerprint,
            format!(
                "fingerprint mismatch: stored {}, recomputed {}",
                bundle.fingerprint, recomputed
            ),
        );
    }

    // ── Step 3: merkle ───────────────────────────────────────────────────────
    if !is_hex_digest(&bundle.merkle_root) {
        return Verdict::fail(
            VerifyStep::Merkle,
            "'merkleRoot' is not a 64-char lowercase hex digest",
        );
    }

    // ── Step 4: internal consistency ─────────────────────────────────────────
    for window in bundle.input_artifact_digests.windows(2) {
        if window[0].name >= window[1].name {
            return Verdict::fail(
                VerifyStep::Consistency,
                format!(
                    "input artifacts not sorted/unique by name at '{}'",
                    window[1].name
                ),
            );
        }
    }
    let digests: Vec<&str> = std::iter::once(bundle.merkle_root.as_str())
        .chain(bundle.input_artifact_digests.iter().map(|a| a.sha256.as_str()))
        .chain([
            bundle.output_digest.as_str(),
            bundle.policy_digest.as_str(),
            bundle.transcript_digest.as_str(),
        ])
        .collect();
    if digests.iter().any(|d| d.is_empty()) {
        return Verdict::fail(VerifyStep::Consistency, "empty digest in cross-hash input");
    }
    let cross_hash = hash_value(&json!(digests));
    debug!(cross_hash = %cross_hash, "derived cross-hash computed");

    // ── Step 5: signature, if present ────────────────────────────────────────
    if let Some(signature) = &bundle.signature {
        if signature.algorithm != "ed25519" {
            return Verdict::fail(
                VerifyStep::Signature,
                format!("unsupported signature algorithm '{}'", signature.algorithm),
            );
        }
        let Some(public_key) = trusted_keys.get(&signature.key_id) else {
            return Verdict::fail(
                VerifyStep::Signature,
                format!("unknown signing key id '{}'", signature.key_id),
            );
        };
        let raw = match hex::decode(&signature.signature) {
            Ok(raw) => raw,
            Err(e) => {
                return Verdict::fail(
                    VerifyStep::Signature,
                    format!("signature is not valid hex: {}", e),
                );
            }
        };
        match verify_ed25519(public_key, bundle.fingerprint.as_bytes(), &raw) {
            Ok(true) => {}
            Ok(false) => {
                return Verdict::fail(
                    VerifyStep::Signature,
                    format!("signature by key '{}' does not verify", signature.key_id),
                );
            }
            Err(e) => {
                return Verdict::fail(VerifyStep::Signature, e.to_string());
            }
        }
    }

    Verdict::pass()
}
