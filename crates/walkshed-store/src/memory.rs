//! In-memory storage implementations for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For shared deployments, use the PostgreSQL backend
//! for the durable tier.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use walkshed_core::error::{Result, WalkshedError};
use walkshed_core::models::{DurableEntry, QuantizedCoordinate};

use crate::ports::{DurableStore, FastStore};

#[derive(Debug, Clone)]
struct FastEntry {
    value: String,
    expires_at: Instant,
}

impl FastEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory implementation of FastStore
#[derive(Debug, Clone, Default)]
pub struct MemoryFastStore {
    entries: Arc<RwLock<HashMap<String, FastEntry>>>,
}

impl MemoryFastStore {
    /// Create a new in-memory fast store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired keys, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}

#[async_trait]
impl FastStore for MemoryFastStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap();
        let now = Instant::now();
        Ok(entries.get(key).filter(|e| e.is_live(now)).map(|e| e.value.clone()))
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key.to_string(),
            FastEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str, ttl_if_new: Duration) -> Result<i64> {
        let mut entries = self.entries.write().unwrap();
        let now = Instant::now();

        match entries.get_mut(key).filter(|e| e.is_live(now)) {
            Some(entry) => {
                let current: i64 = entry.value.parse().map_err(|_| {
                    WalkshedError::Persistence(format!("Value at {} is not an integer", key))
                })?;
                let next = current + 1;
                entry.value = next.to_string();
                Ok(next)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    FastEntry {
                        value: "1".to_string(),
                        expires_at: now + ttl_if_new,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        let entries = self.entries.read().unwrap();
        let now = Instant::now();
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.expires_at.saturating_duration_since(now)))
    }
}

/// In-memory implementation of DurableStore
#[derive(Debug, Clone, Default)]
pub struct MemoryDurableStore {
    entries: Arc<RwLock<Vec<DurableEntry>>>,
}

impl MemoryDurableStore {
    /// Create a new in-memory durable store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DurableStore for MemoryDurableStore {
    async fn insert(&self, entry: &DurableEntry) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.push(entry.clone());
        Ok(())
    }

    async fn find(&self, key: &QuantizedCoordinate) -> Result<Option<DurableEntry>> {
        let entries = self.entries.read().unwrap();
        let now = Utc::now();
        Ok(entries
            .iter()
            .filter(|e| {
                e.key.lat() == key.lat()
                    && e.key.lon() == key.lon()
                    && e.key.decimals() == key.decimals()
                    && !e.is_expired_at(now)
            })
            .max_by_key(|e| e.created_at)
            .cloned())
    }

    async fn purge_expired(&self) -> Result<u64> {
        let mut entries = self.entries.write().unwrap();
        let now = Utc::now();
        let before = entries.len();
        entries.retain(|e| !e.is_expired_at(now));
        Ok((before - entries.len()) as u64)
    }
}
