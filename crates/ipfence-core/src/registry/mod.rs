//! Pluggable backend registry
//!
//! The registry maps a backend name to the factory that can produce a
//! store from a configuration, so a deployment chooses among
//! interchangeable backends without the calling service knowing which
//! one is active.
//!
//! There is no ambient global: construct one [`BackendRegistry`] at
//! process startup, register every backend before the first
//! [`BackendRegistry::open_store`] call, and treat it as read-only
//! afterwards. Pass the instance (or a handle to it) to whatever
//! assembles the store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ipfence_core::config::StoreConfig;
//! use ipfence_core::registry::BackendRegistry;
//! use ipfence_core::store;
//!
//! let registry = BackendRegistry::new();
//! store::memory::register(&registry);
//!
//! let config = StoreConfig::new("memory");
//! let ip_store = registry.open_store(&config).unwrap();
//! ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::traits::{IpStore, StoreFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry of store backends, keyed by name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// lookups and exclusive registration.
#[derive(Default)]
pub struct BackendRegistry {
    backends: RwLock<HashMap<String, Box<dyn StoreFactory>>>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a backend available by the provided name
    ///
    /// Registration happens once, at process initialization, before any
    /// store is opened.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. A duplicate registration
    /// can only result from a coding mistake in the embedding program,
    /// so it aborts startup instead of returning an error.
    pub fn register(&self, name: impl Into<String>, factory: Box<dyn StoreFactory>) {
        let name = name.into();
        let mut backends = self.backends.write().unwrap();
        if backends.contains_key(&name) {
            panic!("registry: backend {name:?} is already registered");
        }
        backends.insert(name, factory);
    }

    /// Open the store specified by a configuration
    ///
    /// Looks up `config.name` and delegates to the factory with the full
    /// configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn IpStore>)`: the backend's store instance
    /// - `Err(Error::UnknownBackend)`: no factory under that name
    /// - any construction error the factory reports, unchanged
    pub fn open_store(&self, config: &StoreConfig) -> Result<Box<dyn IpStore>> {
        let backends = self.backends.read().unwrap();

        let factory = backends
            .get(&config.name)
            .ok_or_else(|| Error::unknown_backend(config.name.clone()))?;

        factory.create(config)
    }

    /// Check if a backend name is registered
    pub fn contains(&self, name: &str) -> bool {
        let backends = self.backends.read().unwrap();
        backends.contains_key(name)
    }

    /// List all registered backend names
    pub fn list(&self) -> Vec<String> {
        let backends = self.backends.read().unwrap();
        backends.keys().cloned().collect()
    }
}
