// # IP Store Trait
//
// Defines the service-facing interface for manipulating IPs and IP
// ranges. A deployment opens one store at startup and issues Add/Has/
// Remove calls against it for the remainder of its lifetime.
//
// ## Concurrency
//
// Queries are the hot path: implementations must allow any number of
// them to run concurrently. Mutations are comparatively rare and must be
// mutually exclusive with all other operations on the same family's
// structure, for the duration of the structural update only.
//
// ## Usage
//
// ```rust,ignore
// use ipfence_core::IpStore;
// use std::net::IpAddr;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* IpStore implementation */;
//
//     store.add_network("10.0.0.0/8").await?;
//     assert!(store.has_ip("10.5.6.7".parse()?).await?);
//
//     store.stop().wait().await?;
//     Ok(())
// }
// ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::net::IpAddr;
use tokio::sync::oneshot;

/// Trait for membership store implementations
///
/// Backends are interchangeable behind this trait; the calling service
/// never knows which one is active.
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait IpStore: Send + Sync + std::fmt::Debug {
    /// Add a single IP address to the store
    ///
    /// Adding an address that is already present is a no-op, not an
    /// error.
    async fn add_ip(&self, ip: IpAddr) -> Result<()>;

    /// Add a range of addresses, denoted by a network in CIDR notation
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the canonical network is stored (duplicates included)
    /// - `Err(Error::InvalidNetwork)`: the text is malformed
    async fn add_network(&self, network: &str) -> Result<()>;

    /// Whether the address is contained in the store or belongs to any
    /// stored network of its family
    async fn has_ip(&self, ip: IpAddr) -> Result<bool>;

    /// Whether any of the given addresses is contained in the store
    ///
    /// An empty input yields `false`: none were found.
    async fn has_any_ip(&self, ips: &[IpAddr]) -> Result<bool>;

    /// Whether all of the given addresses are contained in the store
    ///
    /// An empty input yields `true`: vacuous truth over the empty set.
    async fn has_all_ips(&self, ips: &[IpAddr]) -> Result<bool>;

    /// Remove a single IP address from the store
    ///
    /// This only retracts an entry inserted through [`IpStore::add_ip`];
    /// it never removes a network that happens to cover the address, and
    /// the address stays a member of any such network afterwards.
    ///
    /// # Returns
    ///
    /// - `Err(Error::ResourceDoesNotExist)`: the address was not added
    ///   via the single-address path
    async fn remove_ip(&self, ip: IpAddr) -> Result<()>;

    /// Remove a range of addresses previously added through
    /// [`IpStore::add_network`]
    ///
    /// The given text need not match the previously added text; it must
    /// denote the same canonical network. Removing `192.168.22.123/24`
    /// succeeds after adding `192.168.22.255/24`.
    ///
    /// # Returns
    ///
    /// - `Err(Error::InvalidNetwork)`: the text is malformed
    /// - `Err(Error::ResourceDoesNotExist)`: no canonical match stored
    async fn remove_network(&self, network: &str) -> Result<()>;

    /// Initiate shutdown without blocking
    ///
    /// Teardown runs in a separate task; the returned handle resolves
    /// exactly once, to success or to the teardown error. Every data
    /// operation issued once shutdown has begun fails with
    /// [`Error::StoreStopped`].
    fn stop(&self) -> StopHandle;
}

/// Completion signal for an in-flight shutdown
///
/// Resolves exactly once. If the backend drops its half without
/// reporting, the handle resolves to a backend error rather than
/// hanging.
#[derive(Debug)]
pub struct StopHandle {
    rx: oneshot::Receiver<Result<()>>,
}

impl StopHandle {
    /// Create a sender/handle pair for a backend to resolve
    pub fn pair() -> (oneshot::Sender<Result<()>>, StopHandle) {
        let (tx, rx) = oneshot::channel();
        (tx, StopHandle { rx })
    }

    /// Create a handle that is already resolved
    pub fn resolved(result: Result<()>) -> StopHandle {
        let (tx, handle) = Self::pair();
        let _ = tx.send(result);
        handle
    }

    /// Await shutdown completion
    pub async fn wait(self) -> Result<()> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::backend("stop signal dropped before resolving")),
        }
    }
}

/// Trait for constructing stores from configuration
pub trait StoreFactory: Send + Sync {
    /// Create an [`IpStore`] instance from configuration
    ///
    /// The registry passes the full configuration through unchanged;
    /// backend-specific fields live in [`StoreConfig::params`].
    ///
    /// # Returns
    ///
    /// A boxed store, or a backend-specific construction error.
    fn create(&self, config: &StoreConfig) -> Result<Box<dyn IpStore>>;
}
