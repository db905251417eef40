//! The capability registry: capability id → required tools, plus the
//! node's supported pack major.
//!
//! `validate_pack` enforces the same spec-version major gate the federation
//! layer applies at delegation-accept time; both call the shared
//! `spec_version_major` helper so the two can never disagree.

use std::collections::BTreeMap;

use tracing::warn;

use pactum_contracts::capability::Capability;
use pactum_contracts::error::{PactumError, PactumResult};
use pactum_contracts::pack::{spec_version_major, ExecutionPack};

use crate::manifest::{validate_graph, verify_package_hash};

/// Tracks registered capabilities and the compatibility ceiling for packs.
#[derive(Debug)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<String, Capability>,
    supported_pack_major: u64,
}

impl CapabilityRegistry {
    pub fn new(supported_pack_major: u64) -> Self {
        Self {
            capabilities: BTreeMap::new(),
            supported_pack_major,
        }
    }

    /// The protocol major this registry accepts packs for.
    pub fn supported_pack_major(&self) -> u64 {
        self.supported_pack_major
    }

    /// Register a capability. Duplicate ids are rejected, never merged.
    pub fn register(&mut self, capability: Capability) -> PactumResult<()> {
        if self.capabilities.contains_key(&capability.id) {
            return Err(PactumError::DuplicateCapability {
                capability: capability.id,
            });
        }
        self.capabilities.insert(capability.id.clone(), capability);
        Ok(())
    }

    /// Look up a capability by id.
    pub fn get(&self, id: &str) -> Option<&Capability> {
        self.capabilities.get(id)
    }

    /// All registered capability ids, in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        self.capabilities.keys().map(String::as_str).collect()
    }

    /// Validate a pack against this registry.
    ///
    /// Checks, in order: spec-version major equality, execution-graph
    /// invariants, and package-hash integrity. Any failure rejects the
    /// whole pack.
    pub fn validate_pack(&self, pack: &ExecutionPack) -> PactumResult<()> {
        let pack_major = spec_version_major(&pack.spec_version)?;
        if pack_major != self.supported_pack_major {
            warn!(
                pack_id = %pack.id,
                pack_major,
                supported_major = self.supported_pack_major,
                "pack rejected: incompatible spec version major"
            );
            return Err(PactumError::IncompatibleSpecVersion {
                pack_major,
                supported_major: self.supported_pack_major,
            });
        }

        validate_graph(&pack.execution_graph)?;

        if !verify_package_hash(pack) {
            return Err(PactumError::InvalidManifest {
                reason: format!(
                    "package hash mismatch for pack '{}@{}'",
                    pack.id, pack.version
                ),
            });
        }

        Ok(())
    }
}
