//! File-backed Ed25519 signer.
//!
//! Key material lives in a key directory: `<id>.key` holds the hex-encoded
//! 32-byte seed (owner-only permissions) and `<id>.pub` holds the
//! hex-encoded public key (world-readable). Loading an id that has no key
//! file generates a fresh pair and writes both files.

use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::RngCore;
use tracing::info;

use pactum_contracts::error::{PactumError, PactumResult};

use crate::signer::{SignatureAlgorithm, Signer};

/// An Ed25519 signer whose seed lives in a key directory.
#[derive(Debug)]
pub struct FileKeySigner {
    key_id: String,
    signing_key: SigningKey,
}

impl FileKeySigner {
    /// Load the key pair for `key_id` from `key_dir`, generating and
    /// persisting a fresh one if no seed file exists.
    pub fn load_or_generate(key_dir: &Path, key_id: &str) -> PactumResult<Self> {
        let seed_path = key_dir.join(format!("{}.key", key_id));

        let seed: [u8; 32] = if seed_path.exists() {
            read_seed(&seed_path)?
        } else {
            let mut seed = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed);
            write_key_files(key_dir, key_id, &seed)?;
            info!(key_id = %key_id, dir = %key_dir.display(), "generated new Ed25519 key pair");
            seed
        };

        Ok(Self {
            key_id: key_id.to_string(),
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// The key id this signer signs under.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The hex-encoded public key, as published in the `.pub` file.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }
}

fn read_seed(path: &PathBuf) -> PactumResult<[u8; 32]> {
    let contents = fs::read_to_string(path).map_err(|e| PactumError::KeyMaterial {
        reason: format!("failed to read '{}': {}", path.display(), e),
    })?;
    let bytes = hex::decode(contents.trim()).map_err(|e| PactumError::KeyMaterial {
        reason: format!("seed file '{}' is not valid hex: {}", path.display(), e),
    })?;
    bytes.try_into().map_err(|_| PactumError::KeyMaterial {
        reason: format!("seed file '{}' is not 32 bytes", path.display()),
    })
}

fn write_key_files(key_dir: &Path, key_id: &str, seed: &[u8; 32]) -> PactumResult<()> {
    fs::create_dir_all(key_dir).map_err(|e| PactumError::KeyMaterial {
        reason: format!("failed to create key dir '{}': {}", key_dir.display(), e),
    })?;

    let seed_path = key_dir.join(format!("{}.key", key_id));
    fs::write(&seed_path, hex::encode(seed)).map_err(|e| PactumError::KeyMaterial {
        reason: format!("failed to write '{}': {}", seed_path.display(), e),
    })?;

    // Seed file is owner-only; the public key stays world-readable.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&seed_path, fs::Permissions::from_mode(0o600)).map_err(|e| {
            PactumError::KeyMaterial {
                reason: format!("failed to restrict '{}': {}", seed_path.display(), e),
            }
        })?;
    }

    let public = SigningKey::from_bytes(seed).verifying_key();
    let pub_path = key_dir.join(format!("{}.pub", key_id));
    fs::write(&pub_path, hex::encode(public.to_bytes())).map_err(|e| {
        PactumError::KeyMaterial {
            reason: format!("failed to write '{}': {}", pub_path.display(), e),
        }
    })?;

    Ok(())
}

/// Scan a key directory for the sorted set of key ids (files ending `.key`).
pub fn list_key_ids(key_dir: &Path) -> PactumResult<Vec<String>> {
    let entries = fs::read_dir(key_dir).map_err(|e| PactumError::KeyMaterial {
        reason: format!("failed to scan key dir '{}': {}", key_dir.display(), e),
    })?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PactumError::KeyMaterial {
            reason: format!("failed to read key dir entry: {}", e),
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(id) = name.strip_suffix(".key") {
            ids.push(id.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

/// Verify an Ed25519 signature against a hex-encoded public key.
///
/// Used wherever trust rests on a peer's published key rather than local
/// key material: handshake verification and proof-bundle signature checks.
pub fn verify_ed25519(
    public_key_hex: &str,
    data: &[u8],
    signature: &[u8],
) -> PactumResult<bool> {
    let key_bytes: [u8; 32] = hex::decode(public_key_hex)
        .map_err(|e| PactumError::SignatureInvalid {
            reason: format!("public key is not valid hex: {}", e),
        })?
        .try_into()
        .map_err(|_| PactumError::SignatureInvalid {
            reason: "public key is not 32 bytes".to_string(),
        })?;

    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|e| PactumError::SignatureInvalid {
            reason: format!("public key is not a valid Ed25519 point: {}", e),
        })?;

    let signature =
        Signature::from_slice(signature).map_err(|e| PactumError::SignatureInvalid {
            reason: format!("malformed signature: {}", e),
        })?;

    Ok(verifying_key.verify(data, &signature).is_ok())
}

impl Signer for FileKeySigner {
    fn name(&self) -> &str {
        "file-key"
    }

    fn supported_algorithms(&self) -> Vec<SignatureAlgorithm> {
        vec![SignatureAlgorithm::Ed25519]
    }

    fn sign(&self, data: &[u8], algorithm: SignatureAlgorithm) -> PactumResult<Vec<u8>> {
        if algorithm != SignatureAlgorithm::Ed25519 {
            return Err(PactumError::UnsupportedAlgorithm {
                signer: self.name().to_string(),
                algorithm: algorithm.to_string(),
            });
        }
        Ok(self.signing_key.sign(data).to_bytes().to_vec())
    }

    fn verify(
        &self,
        data: &[u8],
        signature: &[u8],
        algorithm: SignatureAlgorithm,
    ) -> PactumResult<bool> {
        if algorithm != SignatureAlgorithm::Ed25519 {
            return Err(PactumError::UnsupportedAlgorithm {
                signer: self.name().to_string(),
                algorithm: algorithm.to_string(),
            });
        }
        let signature =
            Signature::from_slice(signature).map_err(|e| PactumError::SignatureInvalid {
                reason: format!("malformed signature: {}", e),
            })?;
        Ok(self
            .signing_key
            .verifying_key()
            .verify(data, &signature)
            .is_ok())
    }
}
