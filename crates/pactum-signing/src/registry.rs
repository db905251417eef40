//! Signer registry: name → lazy factory, with a settable default.
//!
//! The registry is an explicit value threaded through whatever constructs
//! the pack registry or proof exporter — there is no process-wide global.
//! Factories run on first resolution; the constructed signer is cached and
//! shared from then on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use pactum_contracts::error::{PactumError, PactumResult};

use crate::signer::Signer;

/// A deferred signer constructor.
pub type SignerFactory = Box<dyn Fn() -> PactumResult<Arc<dyn Signer>> + Send + Sync>;

struct RegistryState {
    factories: HashMap<String, SignerFactory>,
    instances: HashMap<String, Arc<dyn Signer>>,
    default_name: Option<String>,
}

/// A name-keyed collection of signer factories.
///
/// Callers resolve by name at use time rather than holding a fixed signer
/// reference, so key material can rotate by re-registering a factory.
pub struct SignerRegistry {
    state: Mutex<RegistryState>,
}

impl SignerRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                factories: HashMap::new(),
                instances: HashMap::new(),
                default_name: None,
            }),
        }
    }

    fn lock(&self) -> PactumResult<std::sync::MutexGuard<'_, RegistryState>> {
        self.state.lock().map_err(|e| PactumError::Config {
            reason: format!("signer registry lock poisoned: {}", e),
        })
    }

    /// Register `factory` under `name`, replacing any previous registration
    /// and dropping its cached instance.
    pub fn register(&self, name: impl Into<String>, factory: SignerFactory) -> PactumResult<()> {
        let name = name.into();
        let mut state = self.lock()?;
        state.instances.remove(&name);
        state.factories.insert(name, factory);
        Ok(())
    }

    /// Make `name` the default signer. The name must already be registered.
    pub fn set_default(&self, name: &str) -> PactumResult<()> {
        let mut state = self.lock()?;
        if !state.factories.contains_key(name) {
            return Err(PactumError::UnknownSigner { name: name.to_string() });
        }
        state.default_name = Some(name.to_string());
        Ok(())
    }

    /// Resolve the signer registered under `name`, constructing it on first
    /// use and caching the instance.
    pub fn resolve(&self, name: &str) -> PactumResult<Arc<dyn Signer>> {
        let mut state = self.lock()?;
        if let Some(instance) = state.instances.get(name) {
            return Ok(Arc::clone(instance));
        }
        let factory = state
            .factories
            .get(name)
            .ok_or_else(|| PactumError::UnknownSigner { name: name.to_string() })?;
        let instance = factory()?;
        debug!(signer = %name, "signer constructed");
        state.instances.insert(name.to_string(), Arc::clone(&instance));
        Ok(instance)
    }

    /// Resolve the default signer.
    pub fn resolve_default(&self) -> PactumResult<Arc<dyn Signer>> {
        let default_name = {
            let state = self.lock()?;
            state.default_name.clone().ok_or(PactumError::Config {
                reason: "no default signer configured".to_string(),
            })?
        };
        self.resolve(&default_name)
    }

    /// All registered signer names, sorted.
    pub fn names(&self) -> PactumResult<Vec<String>> {
        let state = self.lock()?;
        let mut names: Vec<String> = state.factories.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

impl Default for SignerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
