use walkshed_core::error::{Result, WalkshedError};
use walkshed_core::models::{LookupRequest, LookupResponse};
use walkshed_core::ports::{IsochroneProvider, PoiProvider};
use walkshed_geo::ensure_valid;

use crate::cache::{CacheLookup, TieredCache};
use crate::orchestrator::LookupOrchestrator;
use crate::quota::{Admission, QuotaGuard};

/// Request-level entry point: cache, then quota, then the upstream pipeline
pub struct LookupService<P, I>
where
    P: PoiProvider,
    I: IsochroneProvider,
{
    cache: TieredCache,
    quota: QuotaGuard,
    orchestrator: LookupOrchestrator<P, I>,
}

impl<P, I> LookupService<P, I>
where
    P: PoiProvider,
    I: IsochroneProvider,
{
    pub fn new(cache: TieredCache, quota: QuotaGuard, orchestrator: LookupOrchestrator<P, I>) -> Self {
        Self {
            cache,
            quota,
            orchestrator,
        }
    }

    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    pub fn quota(&self) -> &QuotaGuard {
        &self.quota
    }

    /// Answer one lookup.
    ///
    /// Cache hits are returned readdressed to the caller and never consume
    /// quota. Only a miss on both tiers is checked against and counted toward
    /// the caller's quota before the providers are called.
    pub async fn handle(&self, request: &LookupRequest) -> Result<LookupResponse> {
        ensure_valid(&request.coordinate)?;

        let key = self.cache.key_for(&request.coordinate);

        match self.cache.get(&key).await {
            CacheLookup::Fast(cached) | CacheLookup::Durable(cached) => {
                tracing::info!(key = %key, requested_by = %request.requested_by, "Served from cache");
                return Ok(cached.readdressed(request));
            }
            CacheLookup::Miss => {}
        }

        let identity = request.requested_by.as_str();
        if let Admission::Denied { retry_after } = self.quota.admit(identity).await {
            return Err(WalkshedError::QuotaExceeded {
                identity: identity.to_string(),
                retry_after,
            });
        }
        self.quota.record(identity).await;

        let result = self.orchestrator.lookup(request.coordinate).await?;
        let response = LookupResponse::new(request, result);

        self.cache.put(&key, &response).await;

        Ok(response)
    }
}
