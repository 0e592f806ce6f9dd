//! Core traits for the membership store
//!
//! This module defines the abstract interfaces that all backends must
//! follow.
//!
//! - [`IpStore`]: the service-facing store of addresses and networks
//! - [`StoreFactory`]: constructs a store from a configuration

pub mod ip_store;

pub use ip_store::{IpStore, StopHandle, StoreFactory};
