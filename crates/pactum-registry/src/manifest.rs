//! Pack manifest parsing, graph validation, and package hashing.
//!
//! The package hash is the canonical hash of the pack with `packageHash`
//! and `signature` removed — the same exclusion rule the proof bundle uses
//! for its fingerprint, so signing never invalidates either.

use serde_json::Value;
use tracing::debug;

use pactum_contracts::error::{PactumError, PactumResult};
use pactum_contracts::pack::{ExecutionGraph, ExecutionPack, PackManifest};
use pactum_core::canonical::hash_value;

/// Parse manifest bytes into a `PackManifest`.
///
/// Malformed JSON, a wrong shape, or an empty `id`/`version` all reject
/// with `PACK_INVALID_MANIFEST`.
pub fn parse_manifest(bytes: &[u8]) -> PactumResult<PackManifest> {
    let manifest: PackManifest =
        serde_json::from_slice(bytes).map_err(|e| PactumError::InvalidManifest {
            reason: format!("malformed manifest JSON: {}", e),
        })?;

    if manifest.id.trim().is_empty() {
        return Err(PactumError::InvalidManifest {
            reason: "manifest 'id' must be non-empty".to_string(),
        });
    }
    if manifest.version.trim().is_empty() {
        return Err(PactumError::InvalidManifest {
            reason: "manifest 'version' must be non-empty".to_string(),
        });
    }

    Ok(manifest)
}

/// Validate an execution graph's structural invariants:
/// unique node ids, an existing start node, and edges whose endpoints exist.
pub fn validate_graph(graph: &ExecutionGraph) -> PactumResult<()> {
    let mut ids = std::collections::BTreeSet::new();
    for node in &graph.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(PactumError::InvalidGraph {
                reason: format!("duplicate node id '{}'", node.id),
            });
        }
    }

    if !ids.contains(graph.start.as_str()) {
        return Err(PactumError::InvalidGraph {
            reason: format!("start node '{}' does not exist", graph.start),
        });
    }

    for edge in &graph.edges {
        for endpoint in [&edge.from, &edge.to] {
            if !ids.contains(endpoint.as_str()) {
                return Err(PactumError::InvalidGraph {
                    reason: format!(
                        "edge {} -> {} references unknown node '{}'",
                        edge.from, edge.to, endpoint
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Compute the package hash binding a pack's manifest metadata and graph.
///
/// `packageHash` and `signature` are excluded from the hashed payload.
pub fn package_hash(pack: &ExecutionPack) -> String {
    let mut value =
        serde_json::to_value(pack).expect("an ExecutionPack is always serializable");
    if let Value::Object(map) = &mut value {
        map.remove("packageHash");
        map.remove("signature");
    }
    let hash = hash_value(&value);
    debug!(pack_id = %pack.id, version = %pack.version, hash = %hash, "package hash computed");
    hash
}

/// True when the pack's stored `package_hash` matches its recomputed value.
pub fn verify_package_hash(pack: &ExecutionPack) -> bool {
    pack.package_hash == package_hash(pack)
}
