//! Periodic sweep of expired cache entries

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use walkshed_store::ports::DurableStore;
use walkshed_store::MemoryFastStore;

/// Counts removed by one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub fast: usize,
    pub durable: u64,
}

/// Sweep both tiers once; durable failures are logged and reported as zero
pub async fn purge_once(fast: &MemoryFastStore, durable: &dyn DurableStore) -> PurgeReport {
    let fast_removed = fast.purge_expired();

    let durable_removed = match durable.purge_expired().await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "Durable purge failed");
            0
        }
    };

    PurgeReport {
        fast: fast_removed,
        durable: durable_removed,
    }
}

/// Run `purge_once` every `period` until `shutdown` flips to true
pub fn spawn_purge_task(
    fast: MemoryFastStore,
    durable: Arc<dyn DurableStore>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(period_secs = period.as_secs(), "Cache purge task starting");

        let mut interval = tokio::time::interval(period);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Cache purge task shutting down");
                        break;
                    }
                }

                _ = interval.tick() => {
                    let report = purge_once(&fast, durable.as_ref()).await;
                    if report.fast > 0 || report.durable > 0 {
                        tracing::info!(fast = report.fast, durable = report.durable, "Purged expired cache entries");
                    } else {
                        tracing::debug!("No expired cache entries");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkshed_store::ports::FastStore;
    use walkshed_store::MemoryDurableStore;

    #[tokio::test]
    async fn test_purge_once_sweeps_both_tiers() {
        let fast = MemoryFastStore::new();
        fast.set_with_expiry("poi:1.000:1.000", "{}", Duration::ZERO).await.unwrap();
        fast.set_with_expiry("poi:2.000:2.000", "{}", Duration::from_secs(60)).await.unwrap();
        let durable = MemoryDurableStore::new();

        let report = purge_once(&fast, &durable).await;

        assert_eq!(report, PurgeReport { fast: 1, durable: 0 });
        assert_eq!(fast.len(), 1);
    }

    #[tokio::test]
    async fn test_task_stops_on_shutdown() {
        let (tx, rx) = watch::channel(false);
        let handle = spawn_purge_task(
            MemoryFastStore::new(),
            Arc::new(MemoryDurableStore::new()),
            Duration::from_secs(3600),
            rx,
        );

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }
}
