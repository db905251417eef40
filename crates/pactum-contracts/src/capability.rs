//! Capability registry entry types.
//!
//! A capability maps a stable id to the set of tools a pack must declare to
//! claim it. Capabilities are registered once and never mutated — the
//! registry rejects duplicate ids rather than merging.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A registered capability: an id plus the tools it requires.
///
/// Ids should be namespaced and descriptive, e.g. "net:egress",
/// "storage:write", "model:invoke".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    /// Unique capability id.
    pub id: String,
    /// Tools a pack must declare to hold this capability.
    pub required_tools: BTreeSet<String>,
}

impl Capability {
    /// Construct a capability from an id and its required tools.
    pub fn new(id: impl Into<String>, required_tools: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: id.into(),
            required_tools: required_tools.into_iter().collect(),
        }
    }
}
