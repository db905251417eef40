//! Registry index validation, deterministic listing, and snapshot hashing.
//!
//! The index is the published catalogue of pack versions. Validation runs
//! in two phases: a JSON Schema check over the raw document shape, then
//! field-level checks. Any missing mandatory field rejects the whole index,
//! never a single entry — a partially trusted catalogue is worse than none.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use pactum_contracts::error::{PactumError, PactumResult};
use pactum_core::canonical::hash_value;

/// One published version of a pack.
///
/// Every field except `signature_url` is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexVersion {
    pub version: String,
    pub sha256: String,
    pub manifest_url: String,
    pub bundle_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
    pub signature_key_id: String,
    pub risk_level: String,
    pub tier_required: String,
}

/// A pack and all of its published versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPackage {
    pub id: String,
    pub versions: Vec<IndexVersion>,
}

/// The full registry index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryIndex {
    pub packages: Vec<IndexPackage>,
}

/// One row of a deterministic index listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackListing {
    pub id: String,
    pub version: String,
}

/// The structural schema the raw index document must satisfy before any
/// field-level checks run.
fn index_schema() -> Value {
    json!({
        "type": "object",
        "required": ["packages"],
        "properties": {
            "packages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "versions"],
                    "properties": {
                        "id": { "type": "string" },
                        "versions": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": [
                                    "version", "sha256", "manifest_url", "bundle_url",
                                    "signature_key_id", "risk_level", "tier_required"
                                ]
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Parse and fully validate a registry index document.
///
/// Rejections carry `PACK_INVALID_INDEX` and name the first offending
/// package/version; the whole index is rejected either way.
pub fn parse_index(bytes: &[u8]) -> PactumResult<RegistryIndex> {
    let raw: Value = serde_json::from_slice(bytes).map_err(|e| PactumError::InvalidIndex {
        reason: format!("malformed index JSON: {}", e),
    })?;

    // Phase 1: document shape.
    let validator =
        jsonschema::validator_for(&index_schema()).map_err(|e| PactumError::InvalidIndex {
            reason: format!("index schema failed to compile: {}", e),
        })?;
    if let Some(error) = validator.iter_errors(&raw).next() {
        return Err(PactumError::InvalidIndex {
            reason: format!("schema violation at {}: {}", error.instance_path, error),
        });
    }

    let index: RegistryIndex =
        serde_json::from_value(raw).map_err(|e| PactumError::InvalidIndex {
            reason: format!("index does not match expected structure: {}", e),
        })?;

    validate_index(&index)?;
    Ok(index)
}

/// Field-level validation of an already-parsed index.
pub fn validate_index(index: &RegistryIndex) -> PactumResult<()> {
    for package in &index.packages {
        if package.id.trim().is_empty() {
            return Err(PactumError::InvalidIndex {
                reason: "package with empty id".to_string(),
            });
        }
        if package.versions.is_empty() {
            return Err(PactumError::InvalidIndex {
                reason: format!("package '{}' has no versions", package.id),
            });
        }
        for entry in &package.versions {
            for (field, value) in [
                ("version", &entry.version),
                ("sha256", &entry.sha256),
                ("manifest_url", &entry.manifest_url),
                ("bundle_url", &entry.bundle_url),
                ("signature_key_id", &entry.signature_key_id),
                ("risk_level", &entry.risk_level),
                ("tier_required", &entry.tier_required),
            ] {
                if value.trim().is_empty() {
                    return Err(PactumError::InvalidIndex {
                        reason: format!(
                            "package '{}' version entry is missing '{}'",
                            package.id, field
                        ),
                    });
                }
            }
            // Versions must be semver so listings sort deterministically.
            semver::Version::parse(&entry.version).map_err(|e| PactumError::InvalidIndex {
                reason: format!(
                    "package '{}' version '{}' is not semver: {}",
                    package.id, entry.version, e
                ),
            })?;
        }
    }

    debug!(packages = index.packages.len(), "registry index validated");
    Ok(())
}

/// Deterministic listing of every `(id, version)` pair: sorted by id, ties
/// by semver order.
///
/// Works on any `RegistryIndex`, validated or not — an entry whose version
/// is not semver is a `PACK_INVALID_VERSION` error, never a silently
/// dropped row.
pub fn list_all(index: &RegistryIndex) -> PactumResult<Vec<PackListing>> {
    let mut rows: Vec<(String, semver::Version)> = Vec::new();
    for package in &index.packages {
        for entry in &package.versions {
            let parsed = semver::Version::parse(&entry.version).map_err(|e| {
                PactumError::InvalidVersion {
                    version: entry.version.clone(),
                    reason: e.to_string(),
                }
            })?;
            rows.push((package.id.clone(), parsed));
        }
    }
    rows.sort();

    Ok(rows
        .into_iter()
        .map(|(id, version)| PackListing {
            id,
            version: version.to_string(),
        })
        .collect())
}

/// Page-based slicing over the sorted listing. Pages are zero-based; a page
/// past the end is empty, never an error.
pub fn list_page(
    index: &RegistryIndex,
    page: usize,
    page_size: usize,
) -> PactumResult<Vec<PackListing>> {
    if page_size == 0 {
        return Ok(Vec::new());
    }
    Ok(list_all(index)?
        .into_iter()
        .skip(page * page_size)
        .take(page_size)
        .collect())
}

/// The canonical hash of the index — the registry snapshot identity the
/// federation layer compares across nodes.
pub fn snapshot_hash(index: &RegistryIndex) -> String {
    let value = serde_json::to_value(index).expect("a RegistryIndex is always serializable");
    hash_value(&value)
}
