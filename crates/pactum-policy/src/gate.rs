//! The policy gate.
//!
//! Evaluation algorithm, in order:
//!
//! 1. Every requested tool must be in the pack's `declared_tools`,
//!    else `UNDECLARED_TOOL`.
//! 2. Every requested permission must be in both the pack's
//!    `declared_permissions` and the org's `allowed_permissions`,
//!    else `PERMISSION_DENIED`.
//! 3. If the org requires determinism and the pack is not deterministic,
//!    `NONDETERMINISTIC_PACK`.
//! 4. `allowed = violations.is_empty()`.
//!
//! The gate never mutates state and never retries. An enforcing caller
//! treats the decision as binding; a dry-run caller computes the identical
//! decision but chooses not to block on it.

use tracing::{debug, warn};

use pactum_contracts::pack::ExecutionPack;
use pactum_contracts::policy::{Decision, EvaluationMode, OrgPolicy, Violation, ViolationCode};
use pactum_core::canonical::hash_value;

/// Evaluate a requested execution against an org policy and a pack's
/// declarations.
///
/// Pure: the decision is a function of its arguments alone, so every node
/// evaluating the same request reaches the same decision.
pub fn evaluate(
    policy: &OrgPolicy,
    pack: &ExecutionPack,
    requested_tools: &[String],
    requested_permissions: &[String],
    mode: EvaluationMode,
) -> Decision {
    let mut violations: Vec<Violation> = Vec::new();

    for tool in requested_tools {
        if !pack.declared_tools.contains(tool) {
            violations.push(Violation {
                code: ViolationCode::UndeclaredTool,
                subject: tool.clone(),
                message: format!(
                    "tool '{}' is not declared by pack '{}@{}'",
                    tool, pack.id, pack.version
                ),
            });
        }
    }

    for permission in requested_permissions {
        if !pack.declared_permissions.contains(permission) {
            violations.push(Violation {
                code: ViolationCode::PermissionDenied,
                subject: permission.clone(),
                message: format!(
                    "permission '{}' is not declared by pack '{}@{}'",
                    permission, pack.id, pack.version
                ),
            });
        } else if !policy.allowed_permissions.contains(permission) {
            violations.push(Violation {
                code: ViolationCode::PermissionDenied,
                subject: permission.clone(),
                message: format!("permission '{}' is not allowed by org policy", permission),
            });
        }
    }

    if policy.require_deterministic && !pack.deterministic {
        violations.push(Violation {
            code: ViolationCode::NondeterministicPack,
            subject: pack.id.clone(),
            message: format!(
                "org policy requires determinism and pack '{}@{}' is not deterministic",
                pack.id, pack.version
            ),
        });
    }

    let allowed = violations.is_empty();
    if allowed {
        debug!(pack_id = %pack.id, ?mode, "policy gate allowed request");
    } else {
        warn!(
            pack_id = %pack.id,
            ?mode,
            violation_count = violations.len(),
            "policy gate denied request"
        );
    }

    Decision { allowed, mode, violations }
}

/// Canonical digest of an org policy, as recorded in proof bundles.
pub fn policy_digest(policy: &OrgPolicy) -> String {
    let value = serde_json::to_value(policy).expect("an OrgPolicy is always serializable");
    hash_value(&value)
}
