//! # pactum-policy
//!
//! The fail-closed policy gate for the PACTUM fabric, plus TOML org-policy
//! loading. Evaluation is a pure function of (policy, pack declarations,
//! request, mode) — no hidden state, no retries, no partial decisions.

pub mod config;
pub mod gate;

pub use config::{policy_from_file, policy_from_toml_str};
pub use gate::{evaluate, policy_digest};

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use pactum_contracts::pack::{ExecutionGraph, ExecutionPack, GraphNode};
    use pactum_contracts::policy::{EvaluationMode, OrgPolicy, ViolationCode};

    use super::*;

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn sample_pack(deterministic: bool) -> ExecutionPack {
        ExecutionPack {
            id: "report-builder".into(),
            version: "2.0.0".into(),
            spec_version: "1.0.0".into(),
            declared_tools: BTreeSet::from(["http.get".into(), "render.pdf".into()]),
            declared_permissions: BTreeSet::from(["net:egress".into(), "storage:read".into()]),
            deterministic,
            execution_graph: ExecutionGraph {
                start: "main".into(),
                nodes: vec![GraphNode { id: "main".into(), kind: "tool-call".into() }],
                edges: vec![],
            },
            package_hash: "00".repeat(32),
            signature: None,
        }
    }

    fn permissive_policy() -> OrgPolicy {
        OrgPolicy {
            allowed_permissions: BTreeSet::from(["net:egress".into(), "storage:read".into()]),
            allowed_models: BTreeMap::new(),
            require_deterministic: false,
        }
    }

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── Gate ─────────────────────────────────────────────────────────────────

    #[test]
    fn declared_request_is_allowed() {
        let decision = evaluate(
            &permissive_policy(),
            &sample_pack(true),
            &strs(&["http.get"]),
            &strs(&["net:egress"]),
            EvaluationMode::Enforce,
        );
        assert!(decision.allowed);
        assert!(decision.violations.is_empty());
    }

    #[test]
    fn undeclared_tool_always_fails_closed() {
        let decision = evaluate(
            &permissive_policy(),
            &sample_pack(true),
            &strs(&["tool.blocked"]),
            &[],
            EvaluationMode::Enforce,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.violations.len(), 1);
        assert_eq!(decision.violations[0].code, ViolationCode::UndeclaredTool);
        assert_eq!(decision.violations[0].subject, "tool.blocked");
    }

    #[test]
    fn undeclared_tool_overrides_valid_permissions() {
        // Permissions are fine; the undeclared tool alone must deny.
        let decision = evaluate(
            &permissive_policy(),
            &sample_pack(true),
            &strs(&["tool.blocked"]),
            &strs(&["net:egress", "storage:read"]),
            EvaluationMode::Enforce,
        );
        assert!(!decision.allowed);
        assert!(decision
            .violations
            .iter()
            .any(|v| v.code == ViolationCode::UndeclaredTool && v.subject == "tool.blocked"));
    }

    #[test]
    fn permission_missing_from_pack_declaration_is_denied() {
        let decision = evaluate(
            &permissive_policy(),
            &sample_pack(true),
            &[],
            &strs(&["fs:write"]),
            EvaluationMode::Enforce,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.violations[0].code, ViolationCode::PermissionDenied);
    }

    #[test]
    fn permission_missing_from_org_policy_is_denied() {
        let mut policy = permissive_policy();
        policy.allowed_permissions.remove("storage:read");

        // Declared by the pack, but the org does not allow it.
        let decision = evaluate(
            &policy,
            &sample_pack(true),
            &[],
            &strs(&["storage:read"]),
            EvaluationMode::Enforce,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.violations[0].code, ViolationCode::PermissionDenied);
        assert!(decision.violations[0].message.contains("org policy"));
    }

    #[test]
    fn determinism_requirement_is_enforced() {
        let mut policy = permissive_policy();
        policy.require_deterministic = true;

        let decision = evaluate(
            &policy,
            &sample_pack(false),
            &[],
            &[],
            EvaluationMode::Enforce,
        );
        assert!(!decision.allowed);
        assert_eq!(
            decision.violations[0].code,
            ViolationCode::NondeterministicPack
        );

        let ok = evaluate(&policy, &sample_pack(true), &[], &[], EvaluationMode::Enforce);
        assert!(ok.allowed);
    }

    #[test]
    fn violations_accumulate_rather_than_short_circuit() {
        let mut policy = permissive_policy();
        policy.require_deterministic = true;

        let decision = evaluate(
            &policy,
            &sample_pack(false),
            &strs(&["tool.blocked"]),
            &strs(&["fs:write"]),
            EvaluationMode::Enforce,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.violations.len(), 3);
    }

    #[test]
    fn dry_run_computes_the_identical_decision() {
        let policy = permissive_policy();
        let pack = sample_pack(true);
        let tools = strs(&["tool.blocked"]);

        let enforced = evaluate(&policy, &pack, &tools, &[], EvaluationMode::Enforce);
        let dry = evaluate(&policy, &pack, &tools, &[], EvaluationMode::DryRun);

        assert_eq!(enforced.allowed, dry.allowed);
        assert_eq!(enforced.violations, dry.violations);
        assert_eq!(dry.mode, EvaluationMode::DryRun);
    }

    #[test]
    fn empty_request_against_any_pack_is_allowed() {
        let decision = evaluate(
            &permissive_policy(),
            &sample_pack(true),
            &[],
            &[],
            EvaluationMode::Enforce,
        );
        assert!(decision.allowed);
    }

    // ── Policy digest ────────────────────────────────────────────────────────

    #[test]
    fn policy_digest_is_stable_and_edit_sensitive() {
        let policy = permissive_policy();
        let digest = policy_digest(&policy);
        assert_eq!(policy_digest(&policy), digest);
        assert_eq!(digest.len(), 64);

        let mut edited = permissive_policy();
        edited.require_deterministic = true;
        assert_ne!(policy_digest(&edited), digest);
    }

    // ── TOML loading ─────────────────────────────────────────────────────────

    #[test]
    fn policy_loads_from_toml() {
        let policy = policy_from_toml_str(
            r#"
            require_deterministic = true
            allowed_permissions = ["net:egress", "storage:read"]

            [allowed_models]
            standard = ["small-model"]
            premium = ["small-model", "large-model"]
            "#,
        )
        .unwrap();

        assert!(policy.require_deterministic);
        assert!(policy.allowed_permissions.contains("net:egress"));
        assert_eq!(policy.allowed_models["premium"].len(), 2);
    }

    #[test]
    fn empty_toml_yields_deny_everything_defaults() {
        let policy = policy_from_toml_str("").unwrap();
        assert!(policy.allowed_permissions.is_empty());
        assert!(!policy.require_deterministic);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = policy_from_toml_str("allowed_permissions = 42").unwrap_err();
        assert_eq!(err.code(), "POLICY_CONFIG");
    }
}
