//! # pactum-proof
//!
//! Proof bundle export and verification for the PACTUM fabric.
//!
//! A bundle is created once at the end of a run (`exporter`) and can be
//! checked by any third party without re-execution (`verifier`). The
//! verifier is five ordered, short-circuiting steps with distinct exit
//! codes, so operators can tell a malformed bundle from a tampered one.

pub mod exporter;
pub mod verifier;

pub use exporter::{attach_signature, export, fingerprint_of, ExportParams, BUNDLE_VERSION};
pub use verifier::{verify_bundle, Verdict, VerifyStep};
