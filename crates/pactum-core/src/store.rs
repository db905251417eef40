//! The storage collaborator interface and its reference implementations.
//!
//! The core requires only three semantics from a backing store: `write`,
//! `read`, and sorted `list`. Writes must be atomic from the caller's view
//! — no reader ever observes a partially written entry. `MemoryStore` is
//! the in-process reference; `FsStore` writes to a temporary file and
//! renames into place.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use pactum_contracts::error::{PactumError, PactumResult};

/// The generic key-value collaborator the fabric stores blobs and metadata
/// in. Implementations must make each `write` atomic.
pub trait Storage: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous value atomically.
    fn write(&self, key: &str, bytes: &[u8]) -> PactumResult<()>;

    /// Read the value under `key`, or `EXEC_NOT_FOUND`.
    fn read(&self, key: &str) -> PactumResult<Vec<u8>>;

    /// All keys starting with `prefix`, sorted ascending.
    fn list(&self, prefix: &str) -> PactumResult<Vec<String>>;
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// A `Mutex`-protected in-memory store.
///
/// The `BTreeMap` keeps keys ordered, so `list` is a range scan.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn write(&self, key: &str, bytes: &[u8]) -> PactumResult<()> {
        let mut inner = self.inner.lock().map_err(|e| PactumError::Storage {
            reason: format!("store lock poisoned: {}", e),
        })?;
        inner.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> PactumResult<Vec<u8>> {
        let inner = self.inner.lock().map_err(|e| PactumError::Storage {
            reason: format!("store lock poisoned: {}", e),
        })?;
        inner
            .get(key)
            .cloned()
            .ok_or_else(|| PactumError::NotFound { key: key.to_string() })
    }

    fn list(&self, prefix: &str) -> PactumResult<Vec<String>> {
        let inner = self.inner.lock().map_err(|e| PactumError::Storage {
            reason: format!("store lock poisoned: {}", e),
        })?;
        Ok(inner
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// ── Filesystem store ──────────────────────────────────────────────────────────

/// A filesystem-backed store, one file per key under a root directory.
///
/// Keys must be flat names — path separators are rejected so a key can
/// never escape the root, and the `.tmp` suffix is reserved for in-flight
/// temporaries. Each write lands in a uniquely named `.tmp` file and is
/// renamed into place, which is atomic on POSIX filesystems; concurrent
/// writers to the same key never share a temporary.
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> PactumResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| PactumError::Storage {
            reason: format!("failed to create store root '{}': {}", root.display(), e),
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PactumResult<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains("..") || key.ends_with(".tmp") {
            return Err(PactumError::Storage {
                reason: format!("invalid storage key '{}'", key),
            });
        }
        Ok(self.root.join(key))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Storage for FsStore {
    fn write(&self, key: &str, bytes: &[u8]) -> PactumResult<()> {
        let target = self.path_for(key)?;
        let tmp = self
            .root
            .join(format!("{}.{}.tmp", key, uuid::Uuid::new_v4().simple()));

        fs::write(&tmp, bytes).map_err(|e| PactumError::Storage {
            reason: format!("failed to write '{}': {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &target).map_err(|e| PactumError::Storage {
            reason: format!("failed to rename into '{}': {}", target.display(), e),
        })?;

        debug!(key = %key, size = bytes.len(), "stored blob");
        Ok(())
    }

    fn read(&self, key: &str) -> PactumResult<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PactumError::NotFound { key: key.to_string() })
            }
            Err(e) => Err(PactumError::Storage {
                reason: format!("failed to read '{}': {}", path.display(), e),
            }),
        }
    }

    fn list(&self, prefix: &str) -> PactumResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| PactumError::Storage {
            reason: format!("failed to list '{}': {}", self.root.display(), e),
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PactumError::Storage {
                reason: format!("failed to read directory entry: {}", e),
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // In-flight temporaries are not observable entries.
            if name.ends_with(".tmp") {
                continue;
            }
            if name.starts_with(prefix) {
                keys.push(name);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
