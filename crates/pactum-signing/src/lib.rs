//! # pactum-signing
//!
//! The pluggable signing abstraction for the PACTUM fabric.
//!
//! ## Overview
//!
//! - `Signer` — the trait every signing backend implements
//! - `NoopSigner` — deterministic empty signatures, test-only trust
//! - `FileKeySigner` — Ed25519 over a seed file in a key directory
//! - `SignerRegistry` — name → lazy factory resolution with a settable
//!   default, threaded through configuration rather than a shared global
//!
//! Future backends (HSM-backed signing) plug in by implementing `Signer`
//! and registering a factory.

pub mod filekey;
pub mod noop;
pub mod registry;
pub mod signer;

pub use filekey::{list_key_ids, verify_ed25519, FileKeySigner};
pub use noop::NoopSigner;
pub use registry::{SignerFactory, SignerRegistry};
pub use signer::{SignatureAlgorithm, Signer};
