//! # pactum-federation
//!
//! The inter-node trust layer of the PACTUM fabric: node identity, the
//! challenge/response handshake, and the delegation contract that binds
//! work to a specific registry snapshot and policy version.
//!
//! This is a bilateral, fail-closed protocol — two nodes agree or they do
//! not. There is no quorum, no retry, and no partial acceptance.

pub mod delegation;
pub mod handshake;

pub use delegation::{AttemptState, DelegationAttempt, FederationNode};
pub use handshake::{respond, signing_payload, verify_handshake};
