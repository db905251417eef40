//! # pactum-contracts
//!
//! Shared types, wire schemas, and the error taxonomy for the PACTUM fabric.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod capability;
pub mod error;
pub mod federation;
pub mod pack;
pub mod policy;
pub mod proof;

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::error::PactumError;
    use super::federation::{Challenge, DelegationResult, DelegationStatus};
    use super::pack::spec_version_major;
    use super::policy::{Violation, ViolationCode};
    use super::proof::{ArtifactDigest, BundleSignature, ProofBundle};

    // ── Error taxonomy ───────────────────────────────────────────────────────

    #[test]
    fn trust_errors_are_never_recoverable() {
        let errors = vec![
            PactumError::SignatureInvalid { reason: "bad".into() },
            PactumError::ChallengeExpired { expired_at: "2026-01-01T00:00:00Z".into() },
            PactumError::SnapshotMismatch { ours: "a".into(), theirs: "b".into() },
            PactumError::PolicyVersionMismatch { ours: "1".into(), theirs: "2".into() },
            PactumError::IncompatibleSpecVersion { pack_major: 2, supported_major: 1 },
            PactumError::UnknownKeyId { key_id: "k1".into() },
        ];
        for err in errors {
            assert!(!err.recoverable(), "{} must be fail-closed", err.code());
            assert!(err.code().starts_with("FED_"), "trust errors live in FED_*");
        }
    }

    #[test]
    fn integrity_errors_are_distinct_from_not_found() {
        let poisoned = PactumError::CasPoisoned {
            cid: "aa".repeat(32),
            actual: "bb".repeat(32),
        };
        let missing = PactumError::NotFound { key: "aa".repeat(32) };

        assert_eq!(poisoned.code(), "EXEC_CAS_POISONED");
        assert_eq!(missing.code(), "EXEC_NOT_FOUND");
        assert!(!poisoned.recoverable());
        assert!(missing.recoverable());
    }

    #[test]
    fn structured_error_carries_code_message_and_details() {
        let err = PactumError::SnapshotMismatch {
            ours: "abc".into(),
            theirs: "def".into(),
        };
        let structured = err.to_structured();

        assert_eq!(structured.code, "FED_SNAPSHOT_MISMATCH");
        assert!(structured.message.contains("abc"));
        assert!(structured.message.contains("def"));
        assert!(!structured.recoverable);

        let details = structured.details.expect("mismatch carries details");
        assert_eq!(details["ours"], "abc");
        assert_eq!(details["theirs"], "def");
    }

    #[test]
    fn structured_error_round_trips_through_json() {
        let structured = PactumError::DelegationDepthExceeded { depth: 5, max: 3 }.to_structured();
        let json = serde_json::to_string(&structured).unwrap();
        let decoded: super::error::StructuredError = serde_json::from_str(&json).unwrap();
        assert_eq!(structured, decoded);
    }

    // ── Spec version parsing ─────────────────────────────────────────────────

    #[test]
    fn spec_version_major_parses_semver() {
        assert_eq!(spec_version_major("2.3.1").unwrap(), 2);
        assert_eq!(spec_version_major("0.9.0").unwrap(), 0);
    }

    #[test]
    fn spec_version_major_rejects_garbage() {
        let err = spec_version_major("not-a-version").unwrap_err();
        assert_eq!(err.code(), "PACK_INVALID_VERSION");
    }

    // ── Challenge expiry ─────────────────────────────────────────────────────

    #[test]
    fn challenge_expires_at_the_deadline() {
        let challenge = Challenge::issue("policy-v3", "ab".repeat(32), 300);
        assert!(!challenge.is_expired(challenge.issued_at));
        assert!(!challenge.is_expired(challenge.expires_at - Duration::seconds(1)));
        assert!(challenge.is_expired(challenge.expires_at));
        assert!(challenge.is_expired(challenge.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn challenge_nonces_are_unique() {
        let a = Challenge::issue("p", "h", 60);
        let b = Challenge::issue("p", "h", 60);
        assert_ne!(a.nonce, b.nonce);
    }

    // ── Delegation result ────────────────────────────────────────────────────

    #[test]
    fn delegation_result_helpers() {
        let ok = DelegationResult::accepted();
        assert!(ok.is_accepted());
        assert!(ok.reason.is_none());

        let no = DelegationResult::rejected("registry snapshot mismatch");
        assert_eq!(no.status, DelegationStatus::Rejected);
        assert_eq!(no.reason.as_deref(), Some("registry snapshot mismatch"));
    }

    #[test]
    fn delegation_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DelegationStatus::Accepted).unwrap(),
            "\"accepted\""
        );
        assert_eq!(
            serde_json::to_string(&DelegationStatus::Rejected).unwrap(),
            "\"rejected\""
        );
    }

    // ── Violations ───────────────────────────────────────────────────────────

    #[test]
    fn violation_codes_serialize_screaming_snake() {
        let v = Violation {
            code: ViolationCode::UndeclaredTool,
            subject: "tool.blocked".into(),
            message: "not declared".into(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["code"], "UNDECLARED_TOOL");
    }

    // ── Proof bundle wire shape ──────────────────────────────────────────────

    #[test]
    fn proof_bundle_serializes_camel_case_and_omits_absent_signature() {
        let bundle = ProofBundle {
            version: "1.0.0".into(),
            fingerprint: "00".repeat(32),
            merkle_root: "11".repeat(32),
            input_artifact_digests: vec![ArtifactDigest {
                name: "input.json".into(),
                sha256: "22".repeat(32),
            }],
            output_digest: "33".repeat(32),
            policy_digest: "44".repeat(32),
            transcript_digest: "55".repeat(32),
            engine_version: "0.1.0".into(),
            protocol_version: "1.0.0".into(),
            created_at: Utc::now(),
            run_id: Some(Uuid::new_v4()),
            signature: None,
        };

        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json.get("merkleRoot").is_some());
        assert!(json.get("inputArtifactDigests").is_some());
        assert!(json.get("transcriptDigest").is_some());
        assert!(json.get("signature").is_none(), "absent signature is omitted");
    }

    #[test]
    fn proof_bundle_round_trips_with_signature() {
        let bundle = ProofBundle {
            version: "1.0.0".into(),
            fingerprint: "00".repeat(32),
            merkle_root: "11".repeat(32),
            input_artifact_digests: vec![],
            output_digest: "33".repeat(32),
            policy_digest: "44".repeat(32),
            transcript_digest: "55".repeat(32),
            engine_version: "0.1.0".into(),
            protocol_version: "1.0.0".into(),
            created_at: Utc::now(),
            run_id: None,
            signature: Some(BundleSignature {
                algorithm: "ed25519".into(),
                key_id: "release-key".into(),
                signature: "66".repeat(64),
            }),
        };

        let json = serde_json::to_string(&bundle).unwrap();
        let decoded: ProofBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(bundle, decoded);
    }
}
