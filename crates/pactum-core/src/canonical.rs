//! Canonical JSON serialization and SHA-256 hashing.
//!
//! Everything in the fabric hashes against this module. The canonical form
//! is a frozen, versioned contract shared with every independent
//! implementation:
//!
//!   1. Object keys sorted recursively (byte order).
//!   2. Array order preserved.
//!   3. Compact separators, no whitespace.
//!   4. Non-ASCII characters preserved, not escaped.
//!
//! Wall-clock time and other non-deterministic values must never appear
//! inside hashed payloads; that is a caller obligation this module cannot
//! check.

use serde_json::Value;
use sha2::{Digest, Sha256};

use pactum_contracts::error::{PactumError, PactumResult};

/// Rebuild `value` with every object's keys in sorted order.
///
/// Arrays keep their order; scalars pass through unchanged.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        scalar => scalar.clone(),
    }
}

/// Serialize `value` to its canonical string form.
///
/// Identical output across repeated calls, processes, and independent
/// implementations for identical input — verified by golden fixtures.
pub fn canonical_json(value: &Value) -> String {
    // serde_json's compact writer matches the canonical contract once keys
    // are sorted; a Value is always serializable.
    serde_json::to_string(&sort_keys(value))
        .expect("a serde_json::Value is always serializable")
}

/// SHA-256 over raw bytes, as a lowercase 64-char hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over the canonical form of `value`.
pub fn hash_value(value: &Value) -> String {
    hash_bytes(canonical_json(value).as_bytes())
}

/// Admit a float into the canonical value space.
///
/// `serde_json::Value` cannot represent NaN or infinities, so this boundary
/// is where non-finite numbers are flagged rather than silently dropped.
pub fn canonical_value_from_f64(f: f64) -> PactumResult<Value> {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .ok_or(PactumError::NonFiniteNumber)
}

/// True if `s` is a lowercase 64-character hex string — the shape every
/// digest in the fabric must have.
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
