use crate::application::ports::KeyValueStore;
use crate::domain::entities::{HealthMetric, SyncQueueItem, SyncQueueStatus};
use crate::domain::value_objects::{CacheKey, KeyPattern, SyncOperation, SyncPriority, UserId};
use crate::shared::error::OfflineError;
use chrono::Utc;
use std::sync::Arc;

/// Outbound sync queue stored next to the cache under `syncq_` keys.
///
/// An item lives until its upload succeeds or its retries run out; exhausted
/// items are deleted outright, no dead-letter record is kept.
pub struct SyncQueueService {
    store: Arc<dyn KeyValueStore>,
    max_retries: u32,
}

impl SyncQueueService {
    pub fn new(store: Arc<dyn KeyValueStore>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    /// Queues one item per metric for later upload to `target_platform`.
    pub async fn enqueue(
        &self,
        owner: &UserId,
        metrics: Vec<HealthMetric>,
        operation: SyncOperation,
        target_platform: &str,
        priority: SyncPriority,
    ) -> Result<(), OfflineError> {
        let count = metrics.len();
        for metric in metrics {
            let item = SyncQueueItem::new(
                owner,
                operation,
                metric,
                target_platform.to_string(),
                priority,
                self.max_retries,
            );
            let key = CacheKey::for_queue_item(owner, &item.id);
            self.store
                .put(key.as_str(), &serde_json::to_string(&item)?)
                .await?;
        }

        tracing::debug!(
            target: "offline::queue",
            owner = %owner,
            items = count,
            platform = target_platform,
            priority = %priority,
            "queued metrics for sync"
        );

        Ok(())
    }

    /// Items still eligible for upload, highest priority first and
    /// oldest-first within a priority. Items at or over their retry limit
    /// are filtered out; undecodable ones are deleted on the way through.
    pub async fn pending(
        &self,
        owner: &UserId,
        platform: Option<&str>,
        priority: Option<SyncPriority>,
    ) -> Result<Vec<SyncQueueItem>, OfflineError> {
        let keys = self
            .store
            .keys_matching(&KeyPattern::owner_queue(owner))
            .await?;

        let mut items = Vec::new();
        for key in keys {
            let Some(text) = self.store.get(&key).await? else {
                continue;
            };
            let item = match serde_json::from_str::<SyncQueueItem>(&text) {
                Ok(item) => item,
                Err(err) => {
                    tracing::warn!(
                        target: "offline::queue",
                        key = %key,
                        error = %err,
                        "removing undecodable queue item"
                    );
                    self.store.remove(&key).await?;
                    continue;
                }
            };

            let matches_platform = platform.is_none_or(|p| item.target_platform == p);
            let matches_priority = priority.is_none_or(|p| item.priority == p);
            if matches_platform && matches_priority && item.retries_remaining() {
                items.push(item);
            }
        }

        items.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then(a.created_at.cmp(&b.created_at))
        });

        Ok(items)
    }

    /// Deletes a queue item after a successful upload. Absent items are fine;
    /// a retried delete must not fail.
    pub async fn remove(&self, owner: &UserId, item_id: &str) -> Result<(), OfflineError> {
        let key = CacheKey::for_queue_item(owner, item_id);
        self.store.remove(key.as_str()).await
    }

    /// Bumps the retry counter after a failed upload. While the item is still
    /// under its limit it is re-stored; otherwise it is dropped.
    ///
    /// This is a plain read-modify-write: two concurrent failures on the same
    /// item can both observe the old counter and lose one increment.
    pub async fn record_failure(
        &self,
        owner: &UserId,
        item_id: &str,
        error_message: &str,
    ) -> Result<(), OfflineError> {
        let key = CacheKey::for_queue_item(owner, item_id);
        let Some(text) = self.store.get(key.as_str()).await? else {
            return Ok(());
        };

        let mut item: SyncQueueItem = match serde_json::from_str(&text) {
            Ok(item) => item,
            Err(err) => {
                self.store.remove(key.as_str()).await?;
                return Err(OfflineError::Corrupt(format!(
                    "queue item {item_id}: {err}"
                )));
            }
        };

        item.retry_count += 1;
        if item.retries_remaining() {
            self.store
                .put(key.as_str(), &serde_json::to_string(&item)?)
                .await?;
            tracing::debug!(
                target: "offline::queue",
                item = item_id,
                retry = item.retry_count,
                max = item.max_retries,
                error = error_message,
                "sync attempt failed, will retry"
            );
        } else {
            self.store.remove(key.as_str()).await?;
            tracing::warn!(
                target: "offline::queue",
                item = item_id,
                retries = item.retry_count,
                error = error_message,
                "sync retries exhausted, dropping item"
            );
        }

        Ok(())
    }

    /// Unfiltered scan of the owner's queue for monitoring.
    pub async fn status(&self, owner: &UserId) -> Result<SyncQueueStatus, OfflineError> {
        let keys = self
            .store
            .keys_matching(&KeyPattern::owner_queue(owner))
            .await?;
        let now = Utc::now();

        let mut total = 0u64;
        let mut failed = 0u64;
        let mut size_bytes = 0u64;
        let mut oldest = None;

        for key in keys {
            let Some(text) = self.store.get(&key).await? else {
                continue;
            };
            size_bytes += text.len() as u64;
            let Ok(item) = serde_json::from_str::<SyncQueueItem>(&text) else {
                continue;
            };
            total += 1;
            if !item.retries_remaining() {
                failed += 1;
            }
            oldest = match oldest {
                Some(current) if current <= item.created_at => Some(current),
                _ => Some(item.created_at),
            };
        }

        Ok(SyncQueueStatus {
            total_items: total,
            pending_items: total - failed,
            failed_items: failed,
            oldest_item_age_ms: oldest.map(|created| (now - created).num_milliseconds()),
            queue_size_bytes: size_bytes,
            last_processed_at: Some(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DataSource, MetricType};
    use crate::infrastructure::storage::MemoryKeyValueStore;

    fn owner() -> UserId {
        UserId::new("u1".into()).unwrap()
    }

    fn metric(id: &str) -> HealthMetric {
        HealthMetric::new(
            id.into(),
            "u1".into(),
            MetricType::Steps,
            1000.0,
            "steps".into(),
            Utc::now(),
            DataSource::GarminConnect,
            1.0,
        )
    }

    fn service() -> SyncQueueService {
        SyncQueueService::new(Arc::new(MemoryKeyValueStore::new()), 3)
    }

    async fn enqueue_one(
        service: &SyncQueueService,
        metric_id: &str,
        platform: &str,
        priority: SyncPriority,
    ) {
        service
            .enqueue(
                &owner(),
                vec![metric(metric_id)],
                SyncOperation::Upload,
                platform,
                priority,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pending_orders_by_priority_then_age() {
        let service = service();
        enqueue_one(&service, "m1", "garmin", SyncPriority::Normal).await;
        enqueue_one(&service, "m2", "garmin", SyncPriority::High).await;
        enqueue_one(&service, "m3", "garmin", SyncPriority::Normal).await;

        let pending = service.pending(&owner(), None, None).await.unwrap();
        let ids: Vec<&str> = pending.iter().map(|i| i.metric.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1", "m3"]);
    }

    #[tokio::test]
    async fn platform_filter_excludes_other_targets() {
        let service = service();
        enqueue_one(&service, "m1", "garmin", SyncPriority::Normal).await;
        enqueue_one(&service, "m2", "garmin", SyncPriority::Normal).await;
        enqueue_one(&service, "m3", "garmin", SyncPriority::Normal).await;

        assert!(service
            .pending(&owner(), Some("samsung"), None)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            service
                .pending(&owner(), Some("garmin"), None)
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn priority_filter_selects_exact_level() {
        let service = service();
        enqueue_one(&service, "m1", "garmin", SyncPriority::Critical).await;
        enqueue_one(&service, "m2", "garmin", SyncPriority::Low).await;

        let criticals = service
            .pending(&owner(), None, Some(SyncPriority::Critical))
            .await
            .unwrap();
        assert_eq!(criticals.len(), 1);
        assert_eq!(criticals[0].metric.id, "m1");
    }

    #[tokio::test]
    async fn third_failure_drops_the_item() {
        let service = service();
        enqueue_one(&service, "m1", "garmin", SyncPriority::Normal).await;
        let item_id = service.pending(&owner(), None, None).await.unwrap()[0]
            .id
            .clone();

        service
            .record_failure(&owner(), &item_id, "timeout")
            .await
            .unwrap();
        service
            .record_failure(&owner(), &item_id, "timeout")
            .await
            .unwrap();
        // Two failures recorded; still pending with retries left.
        let pending = service.pending(&owner(), None, None).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].retry_count, 2);

        service
            .record_failure(&owner(), &item_id, "timeout")
            .await
            .unwrap();
        assert!(service.pending(&owner(), None, None).await.unwrap().is_empty());

        // The exhausted item is gone from the store, not just filtered.
        let status = service.status(&owner()).await.unwrap();
        assert_eq!(status.total_items, 0);
    }

    #[tokio::test]
    async fn failure_on_missing_item_is_a_no_op() {
        let service = service();
        service
            .record_failure(&owner(), "no-such-item", "timeout")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn remove_after_success_and_repeat_remove() {
        let service = service();
        enqueue_one(&service, "m1", "garmin", SyncPriority::Normal).await;
        let item_id = service.pending(&owner(), None, None).await.unwrap()[0]
            .id
            .clone();

        service.remove(&owner(), &item_id).await.unwrap();
        assert!(service.pending(&owner(), None, None).await.unwrap().is_empty());
        service.remove(&owner(), &item_id).await.unwrap();
    }

    #[tokio::test]
    async fn status_reports_depth_and_age() {
        let service = service();
        enqueue_one(&service, "m1", "garmin", SyncPriority::Normal).await;
        enqueue_one(&service, "m2", "garmin", SyncPriority::High).await;

        let status = service.status(&owner()).await.unwrap();
        assert_eq!(status.total_items, 2);
        assert_eq!(status.pending_items, 2);
        assert_eq!(status.failed_items, 0);
        assert!(status.queue_size_bytes > 0);
        assert!(status.oldest_item_age_ms.is_some());
    }
}
