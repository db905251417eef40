//! TOML org-policy configuration.
//!
//! Policy files are written by operators, so the TOML schema uses
//! snake_case keys and converts into the wire-form `OrgPolicy`.
//!
//! Example:
//! ```toml
//! require_deterministic = true
//! allowed_permissions = ["net:egress", "storage:read"]
//!
//! [allowed_models]
//! standard = ["small-model"]
//! premium = ["small-model", "large-model"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use pactum_contracts::error::{PactumError, PactumResult};
use pactum_contracts::policy::OrgPolicy;

/// The on-disk TOML schema for an org policy.
#[derive(Debug, Deserialize)]
struct PolicyDocument {
    #[serde(default)]
    allowed_permissions: BTreeSet<String>,
    #[serde(default)]
    allowed_models: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    require_deterministic: bool,
}

impl From<PolicyDocument> for OrgPolicy {
    fn from(doc: PolicyDocument) -> Self {
        OrgPolicy {
            allowed_permissions: doc.allowed_permissions,
            allowed_models: doc.allowed_models,
            require_deterministic: doc.require_deterministic,
        }
    }
}

/// Parse `s` as a TOML org policy.
///
/// Returns `POLICY_CONFIG` if the TOML is malformed or does not match the
/// expected schema.
pub fn policy_from_toml_str(s: &str) -> PactumResult<OrgPolicy> {
    let doc: PolicyDocument = toml::from_str(s).map_err(|e| PactumError::Config {
        reason: format!("failed to parse policy TOML: {}", e),
    })?;
    Ok(doc.into())
}

/// Read the file at `path` and parse it as a TOML org policy.
pub fn policy_from_file(path: &Path) -> PactumResult<OrgPolicy> {
    let contents = std::fs::read_to_string(path).map_err(|e| PactumError::Config {
        reason: format!("failed to read policy file '{}': {}", path.display(), e),
    })?;
    policy_from_toml_str(&contents)
}
