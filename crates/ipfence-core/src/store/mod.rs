//! Store backends shipped with the core
//!
//! Additional backends live in their own crates and register themselves
//! against a [`crate::registry::BackendRegistry`] at startup.

pub mod memory;

pub use memory::{MemoryStore, MemoryStoreFactory};
