//! The challenge/response handshake.
//!
//! The verifying node issues a time-bounded `Challenge`; the responding
//! node echoes it inside a `HandshakeResponse` whose signature covers the
//! canonical JSON of (challenge, capabilities, nodeId). Verification is a
//! pure function of the two messages plus an explicit clock — there is no
//! server-side session state.
//!
//! Rejection order: expiry, signature, policy version, registry snapshot.
//! All checks are synchronous and side-effect-free on rejection.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use pactum_contracts::error::{PactumError, PactumResult};
use pactum_contracts::federation::{CapabilityClaim, Challenge, HandshakeResponse};
use pactum_core::canonical::canonical_json;
use pactum_signing::{verify_ed25519, SignatureAlgorithm, Signer};

/// The exact byte sequence a handshake signature covers.
///
/// Both sides must derive this identically, so it is the canonical JSON of
/// a three-field object — never an ad-hoc concatenation.
pub fn signing_payload(
    challenge: &Challenge,
    capabilities: &CapabilityClaim,
    node_id: Uuid,
) -> Vec<u8> {
    let value = json!({
        "challenge": challenge,
        "capabilities": capabilities,
        "nodeId": node_id,
    });
    canonical_json(&value).into_bytes()
}

/// Build and sign a response to `challenge`.
pub fn respond(
    challenge: Challenge,
    capabilities: CapabilityClaim,
    node_id: Uuid,
    signer: &dyn Signer,
) -> PactumResult<HandshakeResponse> {
    let payload = signing_payload(&challenge, &capabilities, node_id);
    let signature = signer.sign(&payload, SignatureAlgorithm::Ed25519)?;

    debug!(node_id = %node_id, nonce = %challenge.nonce, "handshake response signed");
    Ok(HandshakeResponse {
        challenge,
        capabilities,
        node_id,
        signature: hex::encode(signature),
    })
}

/// Verify a handshake response against the responder's known public key.
///
/// Checks, in order and fail-closed:
/// 1. the challenge has not expired at `now`;
/// 2. the signature verifies against `peer_public_key_hex`;
/// 3. the advertised policy version equals the challenge's;
/// 4. the advertised registry snapshot hash equals the challenge's.
pub fn verify_handshake(
    response: &HandshakeResponse,
    peer_public_key_hex: &str,
    now: DateTime<Utc>,
) -> PactumResult<()> {
    if response.challenge.is_expired(now) {
        warn!(
            node_id = %response.node_id,
            expires_at = %response.challenge.expires_at,
            "handshake rejected: challenge expired"
        );
        return Err(PactumError::ChallengeExpired {
            expired_at: response.challenge.expires_at.to_rfc3339(),
        });
    }

    let payload = signing_payload(&response.challenge, &response.capabilities, response.node_id);
    let signature = hex::decode(&response.signature).map_err(|e| {
        PactumError::SignatureInvalid {
            reason: format!("signature is not valid hex: {}", e),
        }
    })?;
    if !verify_ed25519(peer_public_key_hex, &payload, &signature)? {
        warn!(node_id = %response.node_id, "handshake rejected: signature does not verify");
        return Err(PactumError::SignatureInvalid {
            reason: format!(
                "handshake signature from node '{}' does not verify",
                response.node_id
            ),
        });
    }

    if response.capabilities.policy_version != response.challenge.policy_version {
        return Err(PactumError::PolicyVersionMismatch {
            ours: response.challenge.policy_version.clone(),
            theirs: response.capabilities.policy_version.clone(),
        });
    }

    if response.capabilities.registry_snapshot_hash != response.challenge.registry_snapshot_hash {
        return Err(PactumError::SnapshotMismatch {
            ours: response.challenge.registry_snapshot_hash.clone(),
            theirs: response.capabilities.registry_snapshot_hash.clone(),
        });
    }

    debug!(node_id = %response.node_id, "handshake verified");
    Ok(())
}
