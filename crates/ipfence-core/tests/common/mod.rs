//! Test doubles and common utilities for architecture contract tests
//!
//! This module provides minimal doubles that verify architectural
//! constraints without implementing real backends.

use ipfence_core::config::StoreConfig;
use ipfence_core::error::{Error, Result};
use ipfence_core::store::MemoryStore;
use ipfence_core::traits::{IpStore, StoreFactory};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Parse helper for test addresses
pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("test address parses")
}

/// A fresh memory-backed store
pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
}

/// A factory that records every configuration it receives and hands out
/// memory stores
pub struct RecordingFactory {
    /// Call counter for create()
    create_call_count: Arc<AtomicUsize>,
    /// Configurations passed to create(), in order
    seen_configs: Arc<Mutex<Vec<StoreConfig>>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            create_call_count: Arc::new(AtomicUsize::new(0)),
            seen_configs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a new RecordingFactory that shares counters with an
    /// existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            create_call_count: Arc::clone(&other.create_call_count),
            seen_configs: Arc::clone(&other.seen_configs),
        }
    }

    /// Get the number of times create() was called
    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    /// Get the most recent configuration passed to create()
    pub fn last_config(&self) -> Option<StoreConfig> {
        self.seen_configs.lock().unwrap().last().cloned()
    }
}

impl StoreFactory for RecordingFactory {
    fn create(&self, config: &StoreConfig) -> Result<Box<dyn IpStore>> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.seen_configs.lock().unwrap().push(config.clone());
        Ok(Box::new(MemoryStore::new()))
    }
}

/// A factory whose construction always fails with a backend error
pub struct FailingFactory {
    pub message: &'static str,
}

impl StoreFactory for FailingFactory {
    fn create(&self, _config: &StoreConfig) -> Result<Box<dyn IpStore>> {
        Err(Error::backend(self.message))
    }
}
