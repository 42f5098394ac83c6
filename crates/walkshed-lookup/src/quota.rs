use std::sync::Arc;
use std::time::Duration;
use walkshed_core::config::LayeredConfig;
use walkshed_store::ports::FastStore;

/// Fixed-window quota: `limit` uncached lookups per identity per `window`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSettings {
    pub limit: u32,
    pub window: Duration,
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self {
            limit: 5,
            window: Duration::from_secs(60 * 60),
        }
    }
}

impl QuotaSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            limit: config.quota_limit.value,
            window: config.quota_window(),
        }
    }
}

/// Outcome of a quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// Per-identity counter kept in the fast store.
///
/// The window starts at the first counted request and the counter lapses with
/// the key. The guard fails open: if the store cannot be read the request is
/// admitted.
#[derive(Clone)]
pub struct QuotaGuard {
    store: Arc<dyn FastStore>,
    settings: QuotaSettings,
}

impl QuotaGuard {
    pub fn new(store: Arc<dyn FastStore>, settings: QuotaSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &QuotaSettings {
        &self.settings
    }

    fn key(identity: &str) -> String {
        format!("quota:{}", identity)
    }

    /// Check whether `identity` may trigger another uncached lookup
    pub async fn admit(&self, identity: &str) -> Admission {
        let key = Self::key(identity);

        let used = match self.store.get(&key).await {
            Ok(Some(raw)) => match raw.parse::<u64>() {
                Ok(used) => used,
                Err(_) => {
                    tracing::warn!(identity, value = %raw, "Unreadable quota counter, admitting");
                    return Admission::Allowed;
                }
            },
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(identity, error = %e, "Quota store unavailable, admitting");
                return Admission::Allowed;
            }
        };

        if used < u64::from(self.settings.limit) {
            return Admission::Allowed;
        }

        let retry_after = match self.store.ttl(&key).await {
            Ok(Some(remaining)) => remaining,
            Ok(None) => self.settings.window,
            Err(e) => {
                tracing::warn!(identity, error = %e, "Failed to read quota expiry");
                self.settings.window
            }
        };

        tracing::info!(identity, used, limit = self.settings.limit, "Quota exceeded");
        Admission::Denied { retry_after }
    }

    /// Count one uncached lookup against `identity`
    pub async fn record(&self, identity: &str) {
        match self.store.incr(&Self::key(identity), self.settings.window).await {
            Ok(count) => tracing::debug!(identity, count, "Recorded quota usage"),
            Err(e) => tracing::warn!(identity, error = %e, "Failed to record quota usage"),
        }
    }
}
