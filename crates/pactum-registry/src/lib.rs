//! # pactum-registry
//!
//! The pack and capability registry for the PACTUM fabric:
//!
//! - manifest parsing and package hashing (`manifest`)
//! - capability registration and pack validation (`capabilities`)
//! - registry index validation, listing, and snapshot hashing (`index`)
//!
//! The registry holds read-only copies of published packs; every validation
//! failure rejects a whole object, never a part of one.

pub mod capabilities;
pub mod index;
pub mod manifest;

pub use capabilities::CapabilityRegistry;
pub use index::{
    list_all, list_page, parse_index, snapshot_hash, validate_index, IndexPackage, IndexVersion,
    PackListing, RegistryIndex,
};
pub use manifest::{package_hash, parse_manifest, validate_graph, verify_package_hash};

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use pactum_contracts::capability::Capability;
    use pactum_contracts::pack::{
        ExecutionGraph, ExecutionPack, GraphEdge, GraphNode, PackSignature,
    };

    use super::*;

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn sample_graph() -> ExecutionGraph {
        ExecutionGraph {
            start: "fetch".into(),
            nodes: vec![
                GraphNode { id: "fetch".into(), kind: "tool-call".into() },
                GraphNode { id: "transform".into(), kind: "pure".into() },
                GraphNode { id: "emit".into(), kind: "tool-call".into() },
            ],
            edges: vec![
                GraphEdge { from: "fetch".into(), to: "transform".into() },
                GraphEdge { from: "transform".into(), to: "emit".into() },
            ],
        }
    }

    fn sample_pack() -> ExecutionPack {
        let mut pack = ExecutionPack {
            id: "deploy-orchestrator".into(),
            version: "1.4.2".into(),
            spec_version: "1.0.0".into(),
            declared_tools: BTreeSet::from(["http.get".into(), "deploy.apply".into()]),
            declared_permissions: BTreeSet::from(["net:egress".into()]),
            deterministic: true,
            execution_graph: sample_graph(),
            package_hash: String::new(),
            signature: None,
        };
        pack.package_hash = package_hash(&pack);
        pack
    }

    fn sample_index_json() -> serde_json::Value {
        json!({
            "packages": [
                {
                    "id": "zeta-pack",
                    "versions": [{
                        "version": "1.0.0",
                        "sha256": "ab".repeat(32),
                        "manifest_url": "https://registry.example.net/zeta/1.0.0/manifest.json",
                        "bundle_url": "https://registry.example.net/zeta/1.0.0/bundle.tar",
                        "signature_key_id": "release-key",
                        "risk_level": "low",
                        "tier_required": "standard"
                    }]
                },
                {
                    "id": "alpha-pack",
                    "versions": [
                        {
                            "version": "10.0.0",
                            "sha256": "cd".repeat(32),
                            "manifest_url": "https://registry.example.net/alpha/10.0.0/manifest.json",
                            "bundle_url": "https://registry.example.net/alpha/10.0.0/bundle.tar",
                            "signature_key_id": "release-key",
                            "risk_level": "medium",
                            "tier_required": "standard"
                        },
                        {
                            "version": "9.0.0",
                            "sha256": "ef".repeat(32),
                            "manifest_url": "https://registry.example.net/alpha/9.0.0/manifest.json",
                            "bundle_url": "https://registry.example.net/alpha/9.0.0/bundle.tar",
                            "signature_url": "https://registry.example.net/alpha/9.0.0/bundle.sig",
                            "signature_key_id": "release-key",
                            "risk_level": "medium",
                            "tier_required": "standard"
                        }
                    ]
                }
            ]
        })
    }

    // ── Manifest parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_manifest_accepts_well_formed_document() {
        let bytes = serde_json::to_vec(&json!({
            "kind": "pack-manifest",
            "id": "deploy-orchestrator",
            "version": "1.4.2",
            "package_hash": "ab".repeat(32),
            "required_capabilities": ["net:egress"],
            "side_effect_types": ["deployment"],
            "risk_level": "medium"
        }))
        .unwrap();

        let manifest = parse_manifest(&bytes).unwrap();
        assert_eq!(manifest.id, "deploy-orchestrator");
        assert!(manifest.tier_requirements.is_none());
    }

    #[test]
    fn parse_manifest_rejects_malformed_json() {
        let err = parse_manifest(b"{not json").unwrap_err();
        assert_eq!(err.code(), "PACK_INVALID_MANIFEST");
    }

    #[test]
    fn parse_manifest_rejects_empty_id_or_version() {
        for (id, version) in [("", "1.0.0"), ("pack", "")] {
            let bytes = serde_json::to_vec(&json!({
                "kind": "pack-manifest",
                "id": id,
                "version": version,
                "package_hash": "ab".repeat(32),
                "required_capabilities": [],
                "side_effect_types": [],
                "risk_level": "low"
            }))
            .unwrap();
            assert_eq!(parse_manifest(&bytes).unwrap_err().code(), "PACK_INVALID_MANIFEST");
        }
    }

    // ── Graph validation ─────────────────────────────────────────────────────

    #[test]
    fn valid_graph_passes() {
        validate_graph(&sample_graph()).unwrap();
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let mut graph = sample_graph();
        graph.nodes.push(GraphNode { id: "fetch".into(), kind: "tool-call".into() });
        assert_eq!(validate_graph(&graph).unwrap_err().code(), "PACK_INVALID_GRAPH");
    }

    #[test]
    fn missing_start_node_is_rejected() {
        let mut graph = sample_graph();
        graph.start = "ghost".into();
        assert_eq!(validate_graph(&graph).unwrap_err().code(), "PACK_INVALID_GRAPH");
    }

    #[test]
    fn dangling_edge_endpoint_is_rejected() {
        let mut graph = sample_graph();
        graph.edges.push(GraphEdge { from: "emit".into(), to: "nowhere".into() });
        assert_eq!(validate_graph(&graph).unwrap_err().code(), "PACK_INVALID_GRAPH");
    }

    // ── Package hash ─────────────────────────────────────────────────────────

    #[test]
    fn package_hash_is_stable() {
        let pack = sample_pack();
        assert_eq!(package_hash(&pack), package_hash(&pack));
        assert!(verify_package_hash(&pack));
    }

    #[test]
    fn attaching_a_signature_does_not_change_the_hash() {
        let mut pack = sample_pack();
        let before = package_hash(&pack);
        pack.signature = Some(PackSignature {
            algorithm: "ed25519".into(),
            key_id: "release-key".into(),
            bytes: "00".repeat(64),
        });
        assert_eq!(package_hash(&pack), before);
        assert!(verify_package_hash(&pack));
    }

    #[test]
    fn any_edit_invalidates_the_stored_hash() {
        let mut pack = sample_pack();
        pack.declared_tools.insert("secret.exfiltrate".into());
        assert!(!verify_package_hash(&pack));
    }

    // ── Capability registry ──────────────────────────────────────────────────

    #[test]
    fn duplicate_capability_registration_is_rejected() {
        let mut registry = CapabilityRegistry::new(1);
        registry
            .register(Capability::new("net:egress", ["http.get".to_string()]))
            .unwrap();
        let err = registry
            .register(Capability::new("net:egress", ["http.post".to_string()]))
            .unwrap_err();
        assert_eq!(err.code(), "PACK_DUPLICATE_CAPABILITY");
    }

    #[test]
    fn capability_ids_are_sorted() {
        let mut registry = CapabilityRegistry::new(1);
        registry.register(Capability::new("z:cap", Vec::new())).unwrap();
        registry.register(Capability::new("a:cap", Vec::new())).unwrap();
        assert_eq!(registry.ids(), vec!["a:cap", "z:cap"]);
    }

    #[test]
    fn validate_pack_accepts_compatible_pack() {
        let registry = CapabilityRegistry::new(1);
        registry.validate_pack(&sample_pack()).unwrap();
    }

    #[test]
    fn validate_pack_rejects_wrong_major() {
        let registry = CapabilityRegistry::new(2);
        let err = registry.validate_pack(&sample_pack()).unwrap_err();
        assert_eq!(err.code(), "FED_INCOMPATIBLE_SPEC_VERSION");
    }

    #[test]
    fn validate_pack_rejects_stale_package_hash() {
        let registry = CapabilityRegistry::new(1);
        let mut pack = sample_pack();
        pack.declared_permissions.insert("fs:write".into());
        let err = registry.validate_pack(&pack).unwrap_err();
        assert_eq!(err.code(), "PACK_INVALID_MANIFEST");
    }

    // ── Index validation ─────────────────────────────────────────────────────

    #[test]
    fn well_formed_index_parses() {
        let bytes = serde_json::to_vec(&sample_index_json()).unwrap();
        let index = parse_index(&bytes).unwrap();
        assert_eq!(index.packages.len(), 2);
    }

    #[test]
    fn missing_mandatory_field_rejects_the_whole_index() {
        let mut doc = sample_index_json();
        doc["packages"][0]["versions"][0]
            .as_object_mut()
            .unwrap()
            .remove("bundle_url");
        let err = parse_index(&serde_json::to_vec(&doc).unwrap()).unwrap_err();
        assert_eq!(err.code(), "PACK_INVALID_INDEX");
    }

    #[test]
    fn signature_url_is_optional() {
        let bytes = serde_json::to_vec(&sample_index_json()).unwrap();
        let index = parse_index(&bytes).unwrap();
        let alpha = index.packages.iter().find(|p| p.id == "alpha-pack").unwrap();
        assert!(alpha.versions[0].signature_url.is_none());
        assert!(alpha.versions[1].signature_url.is_some());
    }

    #[test]
    fn package_without_versions_is_rejected() {
        let mut doc = sample_index_json();
        doc["packages"][1]["versions"] = json!([]);
        let err = parse_index(&serde_json::to_vec(&doc).unwrap()).unwrap_err();
        assert_eq!(err.code(), "PACK_INVALID_INDEX");
    }

    #[test]
    fn non_semver_version_is_rejected() {
        let mut doc = sample_index_json();
        doc["packages"][0]["versions"][0]["version"] = json!("latest");
        let err = parse_index(&serde_json::to_vec(&doc).unwrap()).unwrap_err();
        assert_eq!(err.code(), "PACK_INVALID_INDEX");
    }

    // ── Listing and paging ───────────────────────────────────────────────────

    #[test]
    fn listing_sorts_by_id_then_semver_order() {
        let bytes = serde_json::to_vec(&sample_index_json()).unwrap();
        let index = parse_index(&bytes).unwrap();

        let rows = list_all(&index).unwrap();
        let flat: Vec<(String, String)> =
            rows.into_iter().map(|r| (r.id, r.version)).collect();

        // Semver ordering, not lexicographic: 9.0.0 sorts before 10.0.0.
        assert_eq!(
            flat,
            vec![
                ("alpha-pack".to_string(), "9.0.0".to_string()),
                ("alpha-pack".to_string(), "10.0.0".to_string()),
                ("zeta-pack".to_string(), "1.0.0".to_string()),
            ]
        );
    }

    #[test]
    fn paging_slices_the_sorted_sequence() {
        let bytes = serde_json::to_vec(&sample_index_json()).unwrap();
        let index = parse_index(&bytes).unwrap();

        let page0 = list_page(&index, 0, 2).unwrap();
        assert_eq!(page0.len(), 2);
        assert_eq!(page0[0].id, "alpha-pack");

        let page1 = list_page(&index, 1, 2).unwrap();
        assert_eq!(page1.len(), 1);
        assert_eq!(page1[0].id, "zeta-pack");

        assert!(list_page(&index, 5, 2).unwrap().is_empty());
        assert!(list_page(&index, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn listing_an_unvalidated_index_surfaces_bad_versions() {
        // Built by hand, bypassing parse_index, so validation never ran.
        let index = RegistryIndex {
            packages: vec![IndexPackage {
                id: "raw-pack".into(),
                versions: vec![IndexVersion {
                    version: "latest".into(),
                    sha256: "ab".repeat(32),
                    manifest_url: "https://packs.example.net/raw/manifest.json".into(),
                    bundle_url: "https://packs.example.net/raw/bundle.tar".into(),
                    signature_url: None,
                    signature_key_id: "release".into(),
                    risk_level: "low".into(),
                    tier_required: "standard".into(),
                }],
            }],
        };

        let err = list_all(&index).unwrap_err();
        assert_eq!(err.code(), "PACK_INVALID_VERSION");
        assert_eq!(list_page(&index, 0, 10).unwrap_err().code(), "PACK_INVALID_VERSION");
    }

    // ── Snapshot hash ────────────────────────────────────────────────────────

    #[test]
    fn snapshot_hash_is_stable_and_edit_sensitive() {
        let bytes = serde_json::to_vec(&sample_index_json()).unwrap();
        let index = parse_index(&bytes).unwrap();

        let first = snapshot_hash(&index);
        assert_eq!(snapshot_hash(&index), first);

        let mut edited = index.clone();
        edited.packages[0].versions[0].risk_level = "high".into();
        assert_ne!(snapshot_hash(&edited), first);
    }
}
