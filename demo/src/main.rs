//! PACTUM Trust Fabric — Demo CLI
//!
//! Small operational surface over the PACTUM crates: verify a proof bundle
//! from disk, canonically hash a JSON document, and manage file-backed
//! signing keys.
//!
//! Usage:
//!   cargo run -p demo -- verify-bundle bundle.json --trusted-key release=<hex>
//!   cargo run -p demo -- canon-hash document.json
//!   cargo run -p demo -- keygen --key-dir ./keys release
//!   cargo run -p demo -- list-keys --key-dir ./keys
//!
//! `verify-bundle` exit codes: 0 = valid, 1–5 = the failing verification
//! step (schema, fingerprint, merkle, consistency, signature), 6 = the
//! bundle file could not be read.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pactum_core::canonical::{canonical_json, hash_value};
use pactum_proof::verify_bundle;
use pactum_signing::{list_key_ids, FileKeySigner};

// ── CLI definition ────────────────────────────────────────────────────────────

/// PACTUM — trust and verification fabric for federated execution packs.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "PACTUM trust fabric demo",
    long_about = "Verifies proof bundles without re-execution, canonically hashes\n\
                  JSON documents, and manages Ed25519 file keys."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a proof bundle file against a set of trusted keys.
    VerifyBundle {
        /// Path to the bundle JSON file.
        bundle: PathBuf,
        /// Trusted signing keys as `key_id=hex_public_key`. Repeatable.
        #[arg(long = "trusted-key", value_name = "ID=HEX")]
        trusted_keys: Vec<String>,
    },
    /// Print the canonical form and SHA-256 digest of a JSON document.
    CanonHash {
        /// Path to the JSON file.
        document: PathBuf,
    },
    /// Generate (or load) an Ed25519 key pair and print its public key.
    Keygen {
        /// Directory the key files live in.
        #[arg(long = "key-dir", value_name = "DIR")]
        key_dir: PathBuf,
        /// Key id; files are written as `<id>.key` / `<id>.pub`.
        key_id: String,
    },
    /// List the key ids present in a key directory.
    ListKeys {
        #[arg(long = "key-dir", value_name = "DIR")]
        key_dir: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::VerifyBundle { bundle, trusted_keys } => run_verify(bundle, trusted_keys),
        Command::CanonHash { document } => run_canon_hash(document),
        Command::Keygen { key_dir, key_id } => run_keygen(key_dir, &key_id),
        Command::ListKeys { key_dir } => run_list_keys(key_dir),
    }
}

// ── verify-bundle ─────────────────────────────────────────────────────────────

fn run_verify(path: PathBuf, trusted_keys: Vec<String>) -> ExitCode {
    let trusted = match parse_trusted_keys(&trusted_keys) {
        Ok(trusted) => trusted,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(6);
        }
    };

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", path.display(), e);
            return ExitCode::from(6);
        }
    };

    // A bundle that is not even JSON fails the same way a schema-invalid
    // bundle does.
    let bundle = match serde_json::from_str(&raw) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("invalid: bundle is not valid JSON: {}", e);
            return ExitCode::from(1);
        }
    };

    let verdict = verify_bundle(&bundle, &trusted);
    if verdict.valid {
        println!("valid: {}", path.display());
        ExitCode::SUCCESS
    } else {
        let step = verdict.step.map(|s| format!("{:?}", s)).unwrap_or_default();
        eprintln!(
            "invalid at step {} ({}): {}",
            verdict.exit_code(),
            step.to_lowercase(),
            verdict.error.as_deref().unwrap_or_default()
        );
        ExitCode::from(verdict.exit_code() as u8)
    }
}

fn parse_trusted_keys(entries: &[String]) -> Result<BTreeMap<String, String>, String> {
    let mut trusted = BTreeMap::new();
    for entry in entries {
        let Some((id, key)) = entry.split_once('=') else {
            return Err(format!("--trusted-key '{}' is not in id=hex form", entry));
        };
        trusted.insert(id.to_string(), key.to_string());
    }
    Ok(trusted)
}

// ── canon-hash ────────────────────────────────────────────────────────────────

fn run_canon_hash(path: PathBuf) -> ExitCode {
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", path.display(), e);
            return ExitCode::from(6);
        }
    };
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("error: {} is not valid JSON: {}", path.display(), e);
            return ExitCode::from(1);
        }
    };

    println!("{}", canonical_json(&value));
    println!("{}", hash_value(&value));
    ExitCode::SUCCESS
}

// ── keygen / list-keys ────────────────────────────────────────────────────────

fn run_keygen(key_dir: PathBuf, key_id: &str) -> ExitCode {
    match FileKeySigner::load_or_generate(&key_dir, key_id) {
        Ok(signer) => {
            println!("{} {}", key_id, signer.public_key_hex());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(6)
        }
    }
}

fn run_list_keys(key_dir: PathBuf) -> ExitCode {
    match list_key_ids(&key_dir) {
        Ok(ids) => {
            for id in ids {
                println!("{}", id);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(6)
        }
    }
}
