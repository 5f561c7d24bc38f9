use crate::application::ports::{ConnectivityMonitor, SyncGateway, SyncOutcome};
use crate::application::services::{CacheService, SyncQueueService};
use crate::domain::entities::{CacheStatusSnapshot, HealthMetric, SyncQueueStatus, SyncReport};
use crate::domain::value_objects::{SyncOperation, SyncPriority, UserId};
use crate::shared::error::OfflineError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Where the offline subsystem currently is, published for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Caching,
    Cached,
    Syncing,
    Synced,
    PartialSync,
    Conflict,
    Error,
}

/// Ties the cache, the queue, the upload gateway and the connectivity signal
/// together.
///
/// A false-to-true connectivity transition triggers one best-effort drain of
/// the pending queue. Re-entrancy is guarded only by the published phase: a
/// second trigger while a sync is running is ignored, not queued.
pub struct SyncCoordinator {
    cache: Arc<CacheService>,
    queue: Arc<SyncQueueService>,
    gateway: Arc<dyn SyncGateway>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    phase: watch::Sender<SyncPhase>,
}

impl SyncCoordinator {
    pub fn new(
        cache: Arc<CacheService>,
        queue: Arc<SyncQueueService>,
        gateway: Arc<dyn SyncGateway>,
        connectivity: Arc<dyn ConnectivityMonitor>,
    ) -> Self {
        let (phase, _rx) = watch::channel(SyncPhase::Idle);
        Self {
            cache,
            queue,
            gateway,
            connectivity,
            phase,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SyncPhase> {
        self.phase.subscribe()
    }

    /// Caches a mutated batch locally and queues it for upload in one step.
    /// This is the offline write path.
    pub async fn record_offline_mutation(
        &self,
        owner: &UserId,
        metrics: Vec<HealthMetric>,
        operation: SyncOperation,
        target_platform: &str,
        priority: SyncPriority,
    ) -> Result<(), OfflineError> {
        self.phase.send_replace(SyncPhase::Caching);

        let outcome = async {
            self.cache
                .cache_metrics(owner, metrics.clone(), None)
                .await?;
            self.queue
                .enqueue(owner, metrics, operation, target_platform, priority)
                .await
        }
        .await;

        match outcome {
            Ok(()) => {
                self.phase.send_replace(SyncPhase::Cached);
                Ok(())
            }
            Err(err) => {
                self.phase.send_replace(SyncPhase::Error);
                Err(err)
            }
        }
    }

    /// Drains the pending queue through the gateway. Returns a summary even
    /// when individual items fail; store-level errors abort the drain.
    pub async fn sync_pending(&self, owner: &UserId) -> Result<SyncReport, OfflineError> {
        if self.phase() == SyncPhase::Syncing {
            tracing::debug!(
                target: "offline::sync",
                owner = %owner,
                "sync already in progress, ignoring trigger"
            );
            return Ok(SyncReport {
                synced_count: 0,
                failed_count: 0,
                conflict_count: 0,
            });
        }
        self.phase.send_replace(SyncPhase::Syncing);

        match self.drain(owner).await {
            Ok(report) => {
                let phase = if report.conflict_count > 0 {
                    SyncPhase::Conflict
                } else if report.failed_count > 0 {
                    SyncPhase::PartialSync
                } else {
                    SyncPhase::Synced
                };
                self.phase.send_replace(phase);
                tracing::info!(
                    target: "offline::sync",
                    owner = %owner,
                    synced = report.synced_count,
                    failed = report.failed_count,
                    conflicts = report.conflict_count,
                    "sync pass finished"
                );
                Ok(report)
            }
            Err(err) => {
                self.phase.send_replace(SyncPhase::Error);
                tracing::error!(
                    target: "offline::sync",
                    owner = %owner,
                    error = %err,
                    "sync pass aborted"
                );
                Err(err)
            }
        }
    }

    async fn drain(&self, owner: &UserId) -> Result<SyncReport, OfflineError> {
        let items = self.queue.pending(owner, None, None).await?;
        let mut report = SyncReport {
            synced_count: 0,
            failed_count: 0,
            conflict_count: 0,
        };

        for item in items {
            match self.gateway.upload(&item).await {
                Ok(SyncOutcome::Success) => {
                    self.queue.remove(owner, &item.id).await?;
                    report.synced_count += 1;
                }
                Ok(SyncOutcome::Conflict) => {
                    // Left in the queue for the caller to resolve.
                    report.conflict_count += 1;
                }
                Ok(SyncOutcome::PartialSuccess { failure_count, .. }) if failure_count == 0 => {
                    self.queue.remove(owner, &item.id).await?;
                    report.synced_count += 1;
                }
                Ok(SyncOutcome::PartialSuccess { failure_count, .. }) => {
                    self.queue
                        .record_failure(
                            owner,
                            &item.id,
                            &format!("partial upload, {failure_count} failures"),
                        )
                        .await?;
                    report.failed_count += 1;
                }
                Ok(SyncOutcome::Error { message }) => {
                    self.queue.record_failure(owner, &item.id, &message).await?;
                    report.failed_count += 1;
                }
                Err(err) => {
                    self.queue
                        .record_failure(owner, &item.id, &err.to_string())
                        .await?;
                    report.failed_count += 1;
                }
            }
        }

        Ok(report)
    }

    /// Explicit sync attempt; refuses immediately while offline.
    pub async fn force_sync(&self, owner: &UserId) -> Result<SyncReport, OfflineError> {
        if !self.connectivity.is_connected() {
            return Err(OfflineError::Network("no internet connection".to_string()));
        }
        self.sync_pending(owner).await
    }

    /// Watches the reachability signal and kicks off a sync whenever it
    /// flips to connected. Runs until the handle is aborted or the monitor
    /// is dropped.
    pub fn watch_connectivity(self: &Arc<Self>, owner: UserId) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let mut rx = self.connectivity.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if !*rx.borrow_and_update() {
                    continue;
                }
                tracing::info!(
                    target: "offline::sync",
                    owner = %owner,
                    "connectivity restored, attempting pending sync"
                );
                if let Err(err) = coordinator.sync_pending(&owner).await {
                    tracing::warn!(
                        target: "offline::sync",
                        owner = %owner,
                        error = %err,
                        "pending sync after reconnect failed"
                    );
                }
            }
        })
    }

    /// Polls cache statistics on a fixed interval and republishes a status
    /// snapshot. Defaults to the configured interval when none is given.
    /// Cancellation (aborting the handle) stops the next poll; an in-flight
    /// scan finishes on its own.
    pub fn spawn_status_loop(
        self: &Arc<Self>,
        owner: UserId,
        interval: Option<Duration>,
    ) -> (watch::Receiver<CacheStatusSnapshot>, JoinHandle<()>) {
        let interval = interval
            .unwrap_or_else(|| Duration::from_secs(self.cache.config().status_interval_secs));
        let (tx, rx) = watch::channel(empty_snapshot(self.cache.config().max_cache_size_bytes()));
        let coordinator = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match coordinator.status_snapshot(&owner).await {
                    Ok(snapshot) => {
                        tx.send_replace(snapshot);
                    }
                    Err(err) => {
                        tracing::warn!(
                            target: "offline::sync",
                            owner = %owner,
                            error = %err,
                            "status snapshot poll failed"
                        );
                    }
                }
            }
        });

        (rx, handle)
    }

    /// One status poll: cache statistics plus queue depth.
    pub async fn status_snapshot(
        &self,
        owner: &UserId,
    ) -> Result<CacheStatusSnapshot, OfflineError> {
        let stats = self.cache.statistics(owner).await?;
        let queue_status = self.queue.status(owner).await?;

        Ok(CacheStatusSnapshot {
            // Healthy while less than 10% of cached entries have expired.
            is_healthy: stats.expired_metrics * 10 < stats.total_cached_metrics.max(1),
            total_cached_items: stats.total_cached_metrics,
            pending_sync_items: stats.pending_sync_items,
            cache_usage_bytes: stats.total_cache_size_bytes,
            max_cache_usage_bytes: self.cache.config().max_cache_size_bytes(),
            last_cleanup: stats.last_updated,
            queue_status,
        })
    }
}

fn empty_snapshot(max_cache_usage_bytes: u64) -> CacheStatusSnapshot {
    CacheStatusSnapshot {
        is_healthy: true,
        total_cached_items: 0,
        pending_sync_items: 0,
        cache_usage_bytes: 0,
        max_cache_usage_bytes,
        last_cleanup: Utc::now(),
        queue_status: SyncQueueStatus {
            total_items: 0,
            pending_items: 0,
            failed_items: 0,
            oldest_item_age_ms: None,
            queue_size_bytes: 0,
            last_processed_at: None,
        },
    }
}
