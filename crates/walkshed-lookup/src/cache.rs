use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use walkshed_core::config::LayeredConfig;
use walkshed_core::models::{Coordinate, DurableEntry, LookupResponse, QuantizedCoordinate};
use walkshed_geo::quantize;
use walkshed_store::ports::{DurableStore, FastStore};

/// Quantization and expiry policy of the two tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub decimals: u32,
    pub fast_ttl: Duration,
    pub durable_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            decimals: 3,
            fast_ttl: Duration::from_secs(6 * 60 * 60),
            durable_ttl: Duration::from_secs(4 * 24 * 60 * 60),
        }
    }
}

impl CacheSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            decimals: config.cache_decimals.value,
            fast_ttl: config.fast_ttl(),
            durable_ttl: config.durable_ttl(),
        }
    }
}

/// Where a cached response was found
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Fast(LookupResponse),
    /// Found in the durable tier and promoted into the fast tier
    Durable(LookupResponse),
    Miss,
}

impl CacheLookup {
    pub fn into_response(self) -> Option<LookupResponse> {
        match self {
            CacheLookup::Fast(response) | CacheLookup::Durable(response) => Some(response),
            CacheLookup::Miss => None,
        }
    }
}

/// Fast ephemeral tier backed by a durable tier.
///
/// Store failures on either tier are logged and treated as misses or skipped
/// writes; they never reach the caller.
#[derive(Clone)]
pub struct TieredCache {
    fast: Arc<dyn FastStore>,
    durable: Arc<dyn DurableStore>,
    settings: CacheSettings,
}

impl TieredCache {
    pub fn new(
        fast: Arc<dyn FastStore>,
        durable: Arc<dyn DurableStore>,
        settings: CacheSettings,
    ) -> Self {
        Self { fast, durable, settings }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Cache key for a precise coordinate
    pub fn key_for(&self, coordinate: &Coordinate) -> QuantizedCoordinate {
        quantize(coordinate, self.settings.decimals)
    }

    fn fast_key(key: &QuantizedCoordinate) -> String {
        format!("poi:{}", key.cache_key())
    }

    pub async fn get(&self, key: &QuantizedCoordinate) -> CacheLookup {
        let fast_key = Self::fast_key(key);

        match self.fast.get(&fast_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<LookupResponse>(&raw) {
                Ok(response) => {
                    tracing::debug!(key = %key, "Fast tier hit");
                    return CacheLookup::Fast(response);
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "Unreadable fast tier entry"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "Fast tier read failed"),
        }

        let entry = match self.durable.find(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Durable tier read failed");
                return CacheLookup::Miss;
            }
        };

        tracing::debug!(key = %key, created_at = %entry.created_at, "Durable tier hit, promoting");
        self.write_fast(&fast_key, &entry.response).await;

        CacheLookup::Durable(entry.response)
    }

    /// Write a fresh response through both tiers
    pub async fn put(&self, key: &QuantizedCoordinate, response: &LookupResponse) {
        self.write_fast(&Self::fast_key(key), response).await;

        let ttl = chrono::Duration::from_std(self.settings.durable_ttl)
            .unwrap_or_else(|_| chrono::Duration::days(3650));
        let entry = DurableEntry::new(*key, response.clone(), Utc::now(), ttl);

        if let Err(e) = self.durable.insert(&entry).await {
            tracing::warn!(key = %key, error = %e, "Durable tier write failed; response served uncached");
        }
    }

    async fn write_fast(&self, fast_key: &str, response: &LookupResponse) {
        let raw = match serde_json::to_string(response) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = fast_key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };

        if let Err(e) = self.fast.set_with_expiry(fast_key, &raw, self.settings.fast_ttl).await {
            tracing::warn!(key = fast_key, error = %e, "Fast tier write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use walkshed_core::error::{Result, WalkshedError};
    use walkshed_core::models::{CategorizedResult, LookupRequest, Poi};
    use walkshed_store::memory::{MemoryDurableStore, MemoryFastStore};

    fn response_for(lat: f64, lon: f64) -> LookupResponse {
        let request = LookupRequest::new(lat, lon, "client-a");
        let mut result = CategorizedResult::new();
        result.supermarket.push(Poi::new(
            "market",
            Coordinate::new(lat, lon),
            vec!["commercial.supermarket".to_string()],
        ));
        LookupResponse::new(&request, result)
    }

    fn cache() -> (TieredCache, MemoryFastStore, MemoryDurableStore) {
        let fast = MemoryFastStore::new();
        let durable = MemoryDurableStore::new();
        let cache = TieredCache::new(
            Arc::new(fast.clone()),
            Arc::new(durable.clone()),
            CacheSettings::default(),
        );
        (cache, fast, durable)
    }

    #[tokio::test]
    async fn test_put_then_get_hits_fast_tier() {
        let (cache, _fast, durable) = cache();
        let key = cache.key_for(&Coordinate::new(40.00012, -75.00041));
        let response = response_for(40.00012, -75.00041);

        cache.put(&key, &response).await;

        assert_eq!(cache.get(&key).await, CacheLookup::Fast(response));
        assert_eq!(durable.len(), 1);
    }

    /// Durable tier that counts reads and can be made to fail
    #[derive(Default)]
    struct CountingDurable {
        inner: MemoryDurableStore,
        finds: AtomicUsize,
        failing: bool,
    }

    #[async_trait]
    impl DurableStore for CountingDurable {
        async fn insert(&self, entry: &DurableEntry) -> Result<()> {
            if self.failing {
                return Err(WalkshedError::Persistence("connection reset".to_string()));
            }
            self.inner.insert(entry).await
        }

        async fn find(&self, key: &QuantizedCoordinate) -> Result<Option<DurableEntry>> {
            self.finds.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(WalkshedError::Persistence("connection reset".to_string()));
            }
            self.inner.find(key).await
        }

        async fn purge_expired(&self) -> Result<u64> {
            self.inner.purge_expired().await
        }
    }

    #[tokio::test]
    async fn test_fast_hit_skips_durable_tier() {
        let durable = Arc::new(CountingDurable::default());
        let cache = TieredCache::new(
            Arc::new(MemoryFastStore::new()),
            durable.clone(),
            CacheSettings::default(),
        );
        let key = cache.key_for(&Coordinate::new(40.0, -75.0));

        cache.put(&key, &response_for(40.0, -75.0)).await;
        assert!(matches!(cache.get(&key).await, CacheLookup::Fast(_)));

        assert_eq!(durable.finds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_durable_failures_are_absorbed() {
        let durable = Arc::new(CountingDurable {
            failing: true,
            ..Default::default()
        });
        let fast = MemoryFastStore::new();
        let cache =
            TieredCache::new(Arc::new(fast.clone()), durable.clone(), CacheSettings::default());
        let key = cache.key_for(&Coordinate::new(40.0, -75.0));

        assert_eq!(cache.get(&key).await, CacheLookup::Miss);

        // Write still lands in the fast tier
        cache.put(&key, &response_for(40.0, -75.0)).await;
        assert!(matches!(cache.get(&key).await, CacheLookup::Fast(_)));
        assert_eq!(durable.finds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nearby_coordinates_share_entry() {
        let (cache, _fast, _durable) = cache();
        let response = response_for(40.0, -75.0);
        cache.put(&cache.key_for(&Coordinate::new(40.0001, -75.0001)), &response).await;

        let other = cache.key_for(&Coordinate::new(39.9999, -74.9998));
        assert!(matches!(cache.get(&other).await, CacheLookup::Fast(_)));
    }

    #[tokio::test]
    async fn test_durable_hit_is_promoted() {
        let (cache, fast, durable) = cache();
        let key = cache.key_for(&Coordinate::new(40.0, -75.0));
        let response = response_for(40.0, -75.0);

        durable
            .insert(&DurableEntry::new(key, response.clone(), Utc::now(), chrono::Duration::days(4)))
            .await
            .unwrap();
        assert!(fast.is_empty());

        assert_eq!(cache.get(&key).await, CacheLookup::Durable(response.clone()));
        assert_eq!(cache.get(&key).await, CacheLookup::Fast(response));

        let ttl = fast.ttl("poi:40.000:-75.000").await.unwrap().unwrap();
        assert!(ttl <= CacheSettings::default().fast_ttl);
    }

    #[tokio::test]
    async fn test_miss_on_both_tiers() {
        let (cache, _fast, _durable) = cache();
        let key = cache.key_for(&Coordinate::new(1.0, 1.0));
        assert_eq!(cache.get(&key).await, CacheLookup::Miss);
        assert!(cache.get(&key).await.into_response().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_fast_entry_falls_through() {
        let (cache, fast, _durable) = cache();
        let key = cache.key_for(&Coordinate::new(40.0, -75.0));
        fast.set_with_expiry("poi:40.000:-75.000", "{not json", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get(&key).await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_durable_entry_stamped_with_expiry() {
        let (cache, _fast, durable) = cache();
        let key = cache.key_for(&Coordinate::new(40.0, -75.0));
        cache.put(&key, &response_for(40.0, -75.0)).await;

        let entry = durable.find(&key).await.unwrap().unwrap();
        assert_eq!(entry.key, key);
        assert_eq!(entry.expires_at - entry.created_at, chrono::Duration::days(4));
    }
}
