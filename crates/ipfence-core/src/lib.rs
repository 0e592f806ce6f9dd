// # ipfence-core
//
// Core library for the IPFence IP/CIDR membership engine.
//
// ## Architecture Overview
//
// This library decides, per inbound peer address, whether that address
// is a member of the stored set of single addresses and CIDR ranges:
// - **Network**: canonical (family, masked base, prefix length) identity
// - **PrefixSet**: per-family bitwise trie holding both entry kinds
// - **IpStore**: the service-facing operation set (add/has/remove/stop)
// - **BackendRegistry**: name → factory table selecting the backend
// - **MemoryStore**: the in-process backend shipped with the core
//
// ## Design Principles
//
// 1. **Canonical keys**: networks are stored and removed by their masked
//    form, never by their original spelling
// 2. **Read-mostly**: queries run concurrently; mutations take a short
//    per-family write lock
// 3. **Pluggable**: backends are selected by name through the registry,
//    never hard-coded
// 4. **Explicit failures**: runtime-data problems come back as errors;
//    only startup contract violations abort

pub mod config;
pub mod engine;
pub mod error;
pub mod net;
pub mod registry;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use net::{Family, Network};
pub use registry::BackendRegistry;
pub use store::MemoryStore;
pub use traits::{IpStore, StopHandle, StoreFactory};
