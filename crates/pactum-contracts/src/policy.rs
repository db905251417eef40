//! Org policy, policy decisions, and violations.
//!
//! The policy gate consumes an `OrgPolicy` plus a pack's declarations and
//! produces a `Decision`. PACTUM is fail-closed: any requested tool the pack
//! did not declare yields a violation and `allowed = false`, regardless of
//! every other field.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// An organization's standing policy.
///
/// A decision is a pure function of (policy, pack declarations, request,
/// mode) — there is no hidden state, so the same inputs always produce the
/// same decision on every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgPolicy {
    /// Permissions the org allows packs to exercise.
    pub allowed_permissions: BTreeSet<String>,
    /// Model allow-lists keyed by tier, e.g. "standard" → {...}.
    #[serde(default)]
    pub allowed_models: BTreeMap<String, BTreeSet<String>>,
    /// When true, non-deterministic packs are rejected.
    pub require_deterministic: bool,
}

/// Whether the caller intends to act on the decision.
///
/// Both modes compute the identical decision; a dry-run caller simply
/// chooses not to block on it. The mode is recorded on the decision so
/// audit surfaces can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    Enforce,
    DryRun,
}

/// The reason class for a single policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationCode {
    /// A requested tool is absent from the pack's `declared_tools`.
    #[serde(rename = "UNDECLARED_TOOL")]
    UndeclaredTool,
    /// A requested permission is missing from the pack's declarations or
    /// the org's allow-list.
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied,
    /// The org requires determinism and the pack is not deterministic.
    #[serde(rename = "NONDETERMINISTIC_PACK")]
    NondeterministicPack,
}

/// A structured reason a request could not be authorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub code: ViolationCode,
    /// The tool or permission (or pack id, for determinism violations) the
    /// violation names.
    pub subject: String,
    /// Human-readable explanation.
    pub message: String,
}

/// The decision emitted by the policy gate for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// True only when `violations` is empty.
    pub allowed: bool,
    /// The mode the decision was computed under.
    pub mode: EvaluationMode,
    /// All violations found. Empty on allow.
    pub violations: Vec<Violation>,
}
