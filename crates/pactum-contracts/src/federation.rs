//! Federation wire types: node identity, handshake messages, delegation.
//!
//! The handshake challenge is modeled as a value, not a session: the
//! verifying node issues it, hands it to the caller, and the caller presents
//! it back inside the signed response. Verification is therefore a pure
//! function of the two messages plus an explicit clock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pack::ExecutionPack;

/// A node's persistent identity.
///
/// Authentication rests solely on `public_key`; the endpoint is routing
/// metadata and carries no trust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeIdentity {
    /// Stable UUIDv4 for the node's lifetime.
    pub node_id: Uuid,
    /// Hex-encoded Ed25519 public key.
    pub public_key: String,
    /// Reachable endpoint, e.g. "https://node-7.example.net:9443".
    pub endpoint: String,
}

/// A time-bounded handshake challenge issued by the verifying node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Single-use random nonce.
    pub nonce: String,
    /// The issuer's current policy version.
    pub policy_version: String,
    /// The issuer's current registry snapshot hash.
    pub registry_snapshot_hash: String,
    pub issued_at: DateTime<Utc>,
    /// Expiry is the only built-in cancellation primitive.
    pub expires_at: DateTime<Utc>,
}

impl Challenge {
    /// Issue a fresh challenge valid for `ttl_seconds` from now.
    pub fn issue(
        policy_version: impl Into<String>,
        registry_snapshot_hash: impl Into<String>,
        ttl_seconds: i64,
    ) -> Self {
        let issued_at = Utc::now();
        Self {
            nonce: Uuid::new_v4().to_string(),
            policy_version: policy_version.into(),
            registry_snapshot_hash: registry_snapshot_hash.into(),
            issued_at,
            expires_at: issued_at + Duration::seconds(ttl_seconds),
        }
    }

    /// True once `now` is at or past `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// What a responding node advertises about itself during the handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityClaim {
    /// Canonical hash of the responder's advertised capability set.
    pub capabilities_hash: String,
    /// The responder's registry snapshot hash. Must equal the challenge's.
    pub registry_snapshot_hash: String,
    /// The responder's policy version. Must equal the challenge's.
    pub policy_version: String,
}

/// The signed handshake response.
///
/// `signature` covers the canonical JSON of (challenge, capabilities,
/// node_id), hex-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeResponse {
    /// The challenge being answered, echoed verbatim.
    pub challenge: Challenge,
    pub capabilities: CapabilityClaim,
    /// The responding node's id; its known public key verifies `signature`.
    pub node_id: Uuid,
    /// Hex-encoded signature bytes.
    pub signature: String,
}

/// A request for one node to execute a pack on another's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationRequest {
    pub pack: ExecutionPack,
    pub origin_node_id: Uuid,
    /// How many hops this delegation has already traversed.
    pub delegation_depth: u32,
    /// Must equal the accepting node's policy version exactly.
    pub policy_version: String,
    /// Must equal the accepting node's registry snapshot hash exactly.
    pub registry_hash: String,
    /// Protocol version the pack targets; major must match.
    pub spec_version: String,
}

/// Terminal outcome of a delegation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelegationStatus {
    Accepted,
    Rejected,
}

/// The response to a `DelegationRequest` — accepted or rejected outright,
/// never partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationResult {
    pub status: DelegationStatus,
    /// Present on rejection; names the failed check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DelegationResult {
    /// An acceptance with no reason attached.
    pub fn accepted() -> Self {
        Self { status: DelegationStatus::Accepted, reason: None }
    }

    /// A rejection naming the failed check.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            status: DelegationStatus::Rejected,
            reason: Some(reason.into()),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == DelegationStatus::Accepted
    }
}
