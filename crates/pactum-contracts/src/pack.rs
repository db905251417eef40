//! Execution pack and manifest types.
//!
//! An `ExecutionPack` is the immutable, versioned unit of behavior the
//! fabric moves between nodes. A pack is created once at publish time —
//! hashing its canonicalized manifest and graph — and any edit is a new
//! version. The registry holds read-only copies keyed by `(id, version)`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{PactumError, PactumResult};

/// An immutable, versioned behavior unit.
///
/// `package_hash` binds the manifest metadata and execution graph; it is
/// computed over the canonical JSON of the pack with `packageHash` and
/// `signature` removed, so attaching a signature never invalidates the hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPack {
    /// Stable pack identifier, e.g. "deploy-orchestrator".
    pub id: String,
    /// Pack semver, e.g. "1.4.2".
    pub version: String,
    /// Protocol semver this pack targets. Only the major component gates
    /// compatibility.
    pub spec_version: String,
    /// Every tool the pack may ever request. Requests outside this set are
    /// denied by the policy gate regardless of org policy.
    pub declared_tools: BTreeSet<String>,
    /// Every permission the pack may ever request.
    pub declared_permissions: BTreeSet<String>,
    /// True if the pack's execution is deterministic and replayable.
    pub deterministic: bool,
    /// The pack's execution graph.
    pub execution_graph: ExecutionGraph,
    /// Canonical hash binding manifest metadata + graph.
    pub package_hash: String,
    /// Publisher signature over `package_hash`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<PackSignature>,
}

/// A publisher signature attached to a pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackSignature {
    /// Signature algorithm, e.g. "ed25519".
    pub algorithm: String,
    /// Key id resolvable against a trusted-key directory.
    pub key_id: String,
    /// Hex-encoded signature bytes.
    pub bytes: String,
}

/// A pack's execution graph: a set of named nodes, directed edges, and a
/// single start node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionGraph {
    /// The id of the single entry node.
    pub start: String,
    /// All graph nodes. Ids must be unique.
    pub nodes: Vec<GraphNode>,
    /// Directed edges. Both endpoints must name existing nodes.
    pub edges: Vec<GraphEdge>,
}

/// A single node in an execution graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique node id within the graph.
    pub id: String,
    /// Free-form node kind, e.g. "tool-call", "branch".
    pub kind: String,
}

/// A directed edge between two graph nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// The published manifest wire form, as distributed alongside pack bundles.
///
/// Distinct from `ExecutionPack`: the manifest is what a registry index
/// entry's `manifest_url` points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackManifest {
    /// Document kind discriminator, e.g. "pack-manifest".
    pub kind: String,
    pub id: String,
    pub version: String,
    pub package_hash: String,
    pub required_capabilities: Vec<String>,
    pub side_effect_types: Vec<String>,
    pub risk_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_requirements: Option<Vec<String>>,
}

/// Parse the major component of a semver string.
///
/// Used by both the pack-validation and delegation-accept gates so the two
/// can never disagree on what "compatible" means.
pub fn spec_version_major(version: &str) -> PactumResult<u64> {
    let parsed = semver::Version::parse(version).map_err(|e| PactumError::InvalidVersion {
        version: version.to_string(),
        reason: e.to_string(),
    })?;
    Ok(parsed.major)
}
