// # Memory Store
//
// In-memory implementation of IpStore.
//
// ## Purpose
//
// Holds the membership set entirely in process memory: one prefix
// structure per address family, each behind its own reader-writer lock
// so queries on the hot path never block each other, and a mutation on
// one family never blocks queries on the other.
//
// ## Crash Behavior
//
// - All entries are lost on restart/crash
// - No recovery possible (the set is in-memory only)
//
// ## When to Use
//
// - Deployments that repopulate the set at startup (blocklist preload)
// - Testing environments

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::StoreConfig;
use crate::engine::{EntryKind, PrefixSet, ip_bits, network_bits};
use crate::error::{Error, Result};
use crate::net::{Family, Network};
use crate::registry::BackendRegistry;
use crate::traits::{IpStore, StopHandle, StoreFactory};

/// Name this backend registers under
pub const BACKEND_NAME: &str = "memory";

/// In-memory membership store
///
/// # Example
///
/// ```rust,no_run
/// use ipfence_core::store::MemoryStore;
/// use ipfence_core::traits::IpStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStore::new();
///
///     store.add_network("10.0.0.0/8").await?;
///     assert!(store.has_ip("10.5.6.7".parse()?).await?);
///
///     store.stop().wait().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    v4: RwLock<PrefixSet>,
    v6: RwLock<PrefixSet>,
    /// Set at stop() initiation; every data operation checks it first
    stopped: AtomicBool,
}

impl Inner {
    fn family_set(&self, family: Family) -> &RwLock<PrefixSet> {
        match family {
            Family::V4 => &self.v4,
            Family::V6 => &self.v6,
        }
    }
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::from_sets(PrefixSet::new(32), PrefixSet::new(128))
    }

    /// Create a store preloaded with ip-or-cidr rules
    ///
    /// A rule containing `/` is parsed as a network; anything else must
    /// parse as a single address, added via the single-address path.
    pub fn with_rules(rules: &[String]) -> Result<Self> {
        let mut v4 = PrefixSet::new(32);
        let mut v6 = PrefixSet::new(128);
        for rule in rules {
            preload_rule(&mut v4, &mut v6, rule)?;
        }
        Ok(Self::from_sets(v4, v6))
    }

    fn from_sets(v4: PrefixSet, v6: PrefixSet) -> Self {
        Self {
            inner: Arc::new(Inner {
                v4: RwLock::new(v4),
                v6: RwLock::new(v6),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Get the number of stored entries across both families
    pub async fn len(&self) -> usize {
        self.inner.v4.read().await.len() + self.inner.v6.read().await.len()
    }

    /// Check if the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn guard(&self) -> Result<()> {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return Err(Error::StoreStopped);
        }
        Ok(())
    }

    async fn contains(&self, ip: IpAddr) -> bool {
        let (bits, _) = ip_bits(ip);
        let set = self.inner.family_set(Family::of(ip));
        set.read().await.contains(bits)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpStore for MemoryStore {
    async fn add_ip(&self, ip: IpAddr) -> Result<()> {
        self.guard()?;
        let (bits, width) = ip_bits(ip);
        let set = self.inner.family_set(Family::of(ip));
        if set.write().await.insert(bits, width, EntryKind::Single) {
            debug!(%ip, "added address");
        }
        Ok(())
    }

    async fn add_network(&self, network: &str) -> Result<()> {
        self.guard()?;
        let network = Network::parse(network)?;
        let (bits, prefix_len) = network_bits(&network);
        let set = self.inner.family_set(network.family());
        if set.write().await.insert(bits, prefix_len, EntryKind::Network) {
            debug!(%network, "added network");
        }
        Ok(())
    }

    async fn has_ip(&self, ip: IpAddr) -> Result<bool> {
        self.guard()?;
        Ok(self.contains(ip).await)
    }

    async fn has_any_ip(&self, ips: &[IpAddr]) -> Result<bool> {
        self.guard()?;
        for ip in ips {
            if self.contains(*ip).await {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn has_all_ips(&self, ips: &[IpAddr]) -> Result<bool> {
        self.guard()?;
        for ip in ips {
            if !self.contains(*ip).await {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn remove_ip(&self, ip: IpAddr) -> Result<()> {
        self.guard()?;
        let (bits, width) = ip_bits(ip);
        let set = self.inner.family_set(Family::of(ip));
        if !set.write().await.remove_exact(bits, width, EntryKind::Single) {
            return Err(Error::does_not_exist(ip.to_string()));
        }
        debug!(%ip, "removed address");
        Ok(())
    }

    async fn remove_network(&self, network: &str) -> Result<()> {
        self.guard()?;
        let network = Network::parse(network)?;
        let (bits, prefix_len) = network_bits(&network);
        let set = self.inner.family_set(network.family());
        if !set
            .write()
            .await
            .remove_exact(bits, prefix_len, EntryKind::Network)
        {
            return Err(Error::does_not_exist(network.to_string()));
        }
        debug!(%network, "removed network");
        Ok(())
    }

    fn stop(&self) -> StopHandle {
        let (tx, handle) = StopHandle::pair();

        if self.inner.stopped.swap(true, Ordering::SeqCst) {
            let _ = tx.send(Err(Error::StoreStopped));
            return handle;
        }

        debug!("memory store stopping");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // Taking the write locks waits out in-flight operations, so
            // nothing observes a partially released set.
            *inner.v4.write().await = PrefixSet::new(32);
            *inner.v6.write().await = PrefixSet::new(128);
            debug!("memory store stopped");
            let _ = tx.send(Ok(()));
        });
        handle
    }
}

fn preload_rule(v4: &mut PrefixSet, v6: &mut PrefixSet, rule: &str) -> Result<()> {
    let rule = rule.trim();
    if rule.is_empty() {
        return Ok(());
    }

    if rule.contains('/') {
        let network = Network::parse(rule)?;
        let (bits, prefix_len) = network_bits(&network);
        let set = match network.family() {
            Family::V4 => v4,
            Family::V6 => v6,
        };
        set.insert(bits, prefix_len, EntryKind::Network);
    } else {
        let ip = rule
            .parse::<IpAddr>()
            .map_err(|e| Error::invalid_network(format!("bad address rule '{rule}': {e}")))?;
        let (bits, width) = ip_bits(ip);
        let set = match Family::of(ip) {
            Family::V4 => v4,
            Family::V6 => v6,
        };
        set.insert(bits, width, EntryKind::Single);
    }
    Ok(())
}

/// Backend parameters accepted by [`MemoryStoreFactory`]
#[derive(Debug, Clone, Default, Deserialize)]
struct MemoryParams {
    /// Inline ip-or-cidr rules preloaded at construction
    #[serde(default)]
    rules: Vec<String>,
}

/// Factory producing [`MemoryStore`] instances
#[derive(Debug, Clone)]
pub struct MemoryStoreFactory;

impl StoreFactory for MemoryStoreFactory {
    fn create(&self, config: &StoreConfig) -> Result<Box<dyn IpStore>> {
        let params: MemoryParams = if config.params.is_null() {
            MemoryParams::default()
        } else {
            serde_json::from_value(config.params.clone())?
        };

        debug!(rules = params.rules.len(), "opening memory store");
        let store = MemoryStore::with_rules(&params.rules)?;
        Ok(Box::new(store))
    }
}

/// Register this backend under [`BACKEND_NAME`]
pub fn register(registry: &BackendRegistry) {
    registry.register(BACKEND_NAME, Box::new(MemoryStoreFactory));
}
