//! Delegation acceptance and the per-attempt state machine.
//!
//! A delegation binds the requesting node to the accepting node's exact
//! registry snapshot and policy version. Divergence is detected by hash
//! equality, not a shared lock: each node holds its own snapshot copy and
//! the comparison here is what notices drift. Acceptance is all-or-nothing
//! — a rejection carries a reason and changes nothing.

use std::collections::BTreeMap;

use tracing::{info, warn};
use uuid::Uuid;

use pactum_contracts::error::{PactumError, PactumResult};
use pactum_contracts::federation::{
    CapabilityClaim, Challenge, DelegationRequest, DelegationResult, HandshakeResponse,
    NodeIdentity,
};
use pactum_contracts::pack::spec_version_major;
use pactum_core::canonical::hash_value;

use crate::handshake;

/// One node's view of the federation: its identity, trust anchors, and the
/// local values every inbound delegation is compared against.
#[derive(Debug)]
pub struct FederationNode {
    identity: NodeIdentity,
    policy_version: String,
    registry_snapshot_hash: String,
    supported_pack_major: u64,
    max_delegation_depth: u32,
    /// Known peers: node id → hex public key. The sole authentication root.
    peers: BTreeMap<Uuid, String>,
}

impl FederationNode {
    pub fn new(
        identity: NodeIdentity,
        policy_version: impl Into<String>,
        registry_snapshot_hash: impl Into<String>,
        supported_pack_major: u64,
        max_delegation_depth: u32,
    ) -> Self {
        Self {
            identity,
            policy_version: policy_version.into(),
            registry_snapshot_hash: registry_snapshot_hash.into(),
            supported_pack_major,
            max_delegation_depth,
            peers: BTreeMap::new(),
        }
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn policy_version(&self) -> &str {
        &self.policy_version
    }

    pub fn registry_snapshot_hash(&self) -> &str {
        &self.registry_snapshot_hash
    }

    /// Record a peer's identity. Trust in the peer rests entirely on this
    /// public key from now on.
    pub fn add_peer(&mut self, peer: &NodeIdentity) {
        self.peers.insert(peer.node_id, peer.public_key.clone());
    }

    /// Issue a handshake challenge bound to this node's current snapshot
    /// and policy version.
    pub fn issue_challenge(&self, ttl_seconds: i64) -> Challenge {
        Challenge::issue(&self.policy_version, &self.registry_snapshot_hash, ttl_seconds)
    }

    /// Build this node's capability claim for answering a challenge.
    ///
    /// The capabilities hash commits to the sorted advertised id set.
    pub fn capability_claim(&self, advertised: &[String]) -> CapabilityClaim {
        let mut sorted = advertised.to_vec();
        sorted.sort();
        CapabilityClaim {
            capabilities_hash: hash_value(&serde_json::json!(sorted)),
            registry_snapshot_hash: self.registry_snapshot_hash.clone(),
            policy_version: self.policy_version.clone(),
        }
    }

    /// Verify a peer's handshake response at time `now`.
    ///
    /// Fails with `FED_UNKNOWN_NODE` for peers never added, then defers to
    /// `handshake::verify_handshake` for the four protocol checks.
    pub fn verify_response(
        &self,
        response: &HandshakeResponse,
        now: chrono::DateTime<chrono::Utc>,
    ) -> PactumResult<()> {
        let peer_key = self.peers.get(&response.node_id).ok_or_else(|| {
            PactumError::UnknownNode {
                node_id: response.node_id.to_string(),
            }
        })?;
        handshake::verify_handshake(response, peer_key, now)
    }

    /// Decide an inbound delegation request.
    ///
    /// Checks, in order: spec-version major equality, registry snapshot
    /// equality (exact, no fuzzy matching), policy version equality, and
    /// the delegation-depth ceiling. The first failure rejects outright —
    /// never partially — and rejection has no side effects.
    pub fn accept_delegation(&self, request: &DelegationRequest) -> DelegationResult {
        match self.check_delegation(request) {
            Ok(()) => {
                info!(
                    pack_id = %request.pack.id,
                    origin = %request.origin_node_id,
                    "delegation accepted"
                );
                DelegationResult::accepted()
            }
            Err(err) => {
                warn!(
                    pack_id = %request.pack.id,
                    origin = %request.origin_node_id,
                    code = err.code(),
                    "delegation rejected"
                );
                DelegationResult::rejected(format!("{}: {}", err.code(), err))
            }
        }
    }

    fn check_delegation(&self, request: &DelegationRequest) -> PactumResult<()> {
        let pack_major = spec_version_major(&request.spec_version)?;
        if pack_major != self.supported_pack_major {
            return Err(PactumError::IncompatibleSpecVersion {
                pack_major,
                supported_major: self.supported_pack_major,
            });
        }

        if request.registry_hash != self.registry_snapshot_hash {
            return Err(PactumError::SnapshotMismatch {
                ours: self.registry_snapshot_hash.clone(),
                theirs: request.registry_hash.clone(),
            });
        }

        if request.policy_version != self.policy_version {
            return Err(PactumError::PolicyVersionMismatch {
                ours: self.policy_version.clone(),
                theirs: request.policy_version.clone(),
            });
        }

        if request.delegation_depth > self.max_delegation_depth {
            return Err(PactumError::DelegationDepthExceeded {
                depth: request.delegation_depth,
                max: self.max_delegation_depth,
            });
        }

        Ok(())
    }
}

// ── Attempt state machine ─────────────────────────────────────────────────────

/// The lifecycle of one delegation attempt.
///
/// `Proposed → Accepted | Rejected`, terminal either way. There are no
/// internal retries; callers own backoff and must open a fresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    Proposed,
    Accepted,
    Rejected { reason: String },
}

/// A single delegation attempt and its terminal outcome.
#[derive(Debug)]
pub struct DelegationAttempt {
    request: DelegationRequest,
    state: AttemptState,
}

impl DelegationAttempt {
    /// Open a new attempt in the `Proposed` state.
    pub fn propose(request: DelegationRequest) -> Self {
        Self {
            request,
            state: AttemptState::Proposed,
        }
    }

    pub fn request(&self) -> &DelegationRequest {
        &self.request
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state != AttemptState::Proposed
    }

    /// Record the peer's decision. A second resolution is an error — the
    /// state machine is terminal after the first.
    pub fn resolve(&mut self, result: &DelegationResult) -> PactumResult<()> {
        if self.is_terminal() {
            return Err(PactumError::AttemptResolved {
                state: format!("{:?}", self.state),
            });
        }
        self.state = if result.is_accepted() {
            AttemptState::Accepted
        } else {
            AttemptState::Rejected {
                reason: result
                    .reason
                    .clone()
                    .unwrap_or_else(|| "unspecified".to_string()),
            }
        };
        Ok(())
    }
}
