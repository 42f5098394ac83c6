use async_trait::async_trait;
use std::time::Duration;
use walkshed_core::error::Result;
use walkshed_core::models::{DurableEntry, QuantizedCoordinate};

/// Port for the fast cache tier: a shared key/value store with per-key expiry.
///
/// Every operation touches a single key and is atomic on its own; callers
/// compose them without any additional locking.
#[async_trait]
pub trait FastStore: Send + Sync {
    /// Read a live value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value that expires after `ttl`
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Increment an integer counter and return the new value.
    /// A missing or expired key starts at 1 and expires after `ttl_if_new`;
    /// an existing key keeps its expiry.
    async fn incr(&self, key: &str, ttl_if_new: Duration) -> Result<i64>;

    /// Remaining lifetime of a live key
    async fn ttl(&self, key: &str) -> Result<Option<Duration>>;
}

/// Port for the durable cache tier
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Insert a new document
    async fn insert(&self, entry: &DurableEntry) -> Result<()>;

    /// Find the newest unexpired document whose quantized coordinate equals `key`
    async fn find(&self, key: &QuantizedCoordinate) -> Result<Option<DurableEntry>>;

    /// Delete expired documents, returning how many were removed
    async fn purge_expired(&self) -> Result<u64>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
