//! Walkshed Store - Cache tier ports and adapters
//!
//! This crate defines the fast-tier (key/value with per-key expiry) and
//! durable-tier (document store) ports and provides in-memory and PostgreSQL
//! adapters for them.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::{MemoryDurableStore, MemoryFastStore};
pub use ports::{DurableStore, FastStore};
