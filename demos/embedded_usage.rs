//! Minimal embedding example for ipfence-core
//!
//! This example demonstrates using ipfence-core as a library in a custom
//! application: the embedder assembles the registry, adds its own
//! backend next to the built-in one, and drives the store lifecycle.

use ipfence_core::config::StoreConfig;
use ipfence_core::registry::BackendRegistry;
use ipfence_core::store::MemoryStore;
use ipfence_core::traits::{IpStore, StopHandle, StoreFactory};
use ipfence_core::{Result, store};
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Custom backend for embedded usage: a memory store that counts
/// membership queries
#[derive(Debug)]
struct CountingStore {
    inner: MemoryStore,
    query_count: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl IpStore for CountingStore {
    async fn add_ip(&self, ip: IpAddr) -> Result<()> {
        self.inner.add_ip(ip).await
    }

    async fn add_network(&self, network: &str) -> Result<()> {
        self.inner.add_network(network).await
    }

    async fn has_ip(&self, ip: IpAddr) -> Result<bool> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.inner.has_ip(ip).await
    }

    async fn has_any_ip(&self, ips: &[IpAddr]) -> Result<bool> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.inner.has_any_ip(ips).await
    }

    async fn has_all_ips(&self, ips: &[IpAddr]) -> Result<bool> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.inner.has_all_ips(ips).await
    }

    async fn remove_ip(&self, ip: IpAddr) -> Result<()> {
        self.inner.remove_ip(ip).await
    }

    async fn remove_network(&self, network: &str) -> Result<()> {
        self.inner.remove_network(network).await
    }

    fn stop(&self) -> StopHandle {
        self.inner.stop()
    }
}

struct CountingStoreFactory {
    query_count: Arc<AtomicUsize>,
}

impl StoreFactory for CountingStoreFactory {
    fn create(&self, _config: &StoreConfig) -> Result<Box<dyn IpStore>> {
        Ok(Box::new(CountingStore {
            inner: MemoryStore::new(),
            query_count: Arc::clone(&self.query_count),
        }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Registry assembly happens once, before any store is opened.
    let registry = BackendRegistry::new();
    store::memory::register(&registry);

    let query_count = Arc::new(AtomicUsize::new(0));
    registry.register(
        "counting",
        Box::new(CountingStoreFactory {
            query_count: Arc::clone(&query_count),
        }),
    );

    println!("Registered backends: {:?}", registry.list());

    // The embedder picks a backend by name; the rest of the program
    // only sees the IpStore trait.
    let config = StoreConfig::new("counting")
        .with_params(serde_json::json!({"deployment": "demo"}));
    let ip_store = registry.open_store(&config)?;

    ip_store.add_network("10.0.0.0/8").await?;
    ip_store.add_ip("192.168.1.1".parse().expect("valid address")).await?;

    let peer: IpAddr = "10.5.6.7".parse().expect("valid address");
    println!("{} blocked: {}", peer, ip_store.has_ip(peer).await?);

    let peers: Vec<IpAddr> = vec![
        "10.5.6.7".parse().expect("valid address"),
        "192.168.1.1".parse().expect("valid address"),
        "203.0.113.9".parse().expect("valid address"),
    ];
    println!("any blocked: {}", ip_store.has_any_ip(&peers).await?);
    println!("all blocked: {}", ip_store.has_all_ips(&peers).await?);

    ip_store.remove_network("10.99.99.99/8").await?;
    println!("{} blocked after removal: {}", peer, ip_store.has_ip(peer).await?);

    ip_store.stop().wait().await?;
    println!("store stopped; {} queries served", query_count.load(Ordering::SeqCst));

    Ok(())
}
