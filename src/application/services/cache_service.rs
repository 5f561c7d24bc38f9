use crate::application::ports::KeyValueStore;
use crate::domain::entities::{CacheEntry, CacheMetadataRecord, CacheStatistics, HealthMetric};
use crate::domain::value_objects::{CacheKey, KeyPattern, MetricType, UserId};
use crate::shared::config::CacheConfig;
use crate::shared::error::OfflineError;
use chrono::Utc;
use std::sync::Arc;

/// Offline cache for health metrics, layered over a plain key-value store.
///
/// Reads double as cleanup: an entry that fails its checksum or cannot be
/// decoded is removed the moment it is seen, and expired entries are removed
/// unless the caller explicitly asks for them. Writes are best-effort; a
/// failure mid-batch aborts without rolling back earlier entries.
pub struct CacheService {
    store: Arc<dyn KeyValueStore>,
    config: CacheConfig,
}

impl CacheService {
    pub fn new(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Caches a batch of metrics under `health_<owner>_<type>_<metricId>`
    /// keys and refreshes the owner's metadata record.
    pub async fn cache_metrics(
        &self,
        owner: &UserId,
        metrics: Vec<HealthMetric>,
        ttl_hours: Option<i64>,
    ) -> Result<(), OfflineError> {
        let ttl = ttl_hours.unwrap_or(self.config.default_ttl_hours);
        let count = metrics.len() as u64;

        for metric in metrics {
            let key = CacheKey::for_metric(owner, metric.metric_type, &metric.id);
            let entry = CacheEntry::seal(owner, metric, ttl);
            let text = serde_json::to_string(&entry)?;
            self.store.put(key.as_str(), &text).await?;
        }

        let metadata = CacheMetadataRecord {
            last_updated: Utc::now(),
            new_entries_count: count,
        };
        let metadata_key = CacheKey::for_metadata(owner);
        self.store
            .put(metadata_key.as_str(), &serde_json::to_string(&metadata)?)
            .await?;

        tracing::debug!(
            target: "offline::cache",
            owner = %owner,
            entries = count,
            ttl_hours = ttl,
            "cached health metrics"
        );

        Ok(())
    }

    /// Returns the owner's cached metrics, optionally narrowed to one type.
    ///
    /// Corrupt and undecodable entries are deleted as a side effect; expired
    /// ones too unless `include_expired` is set.
    pub async fn cached_metrics(
        &self,
        owner: &UserId,
        metric_type: Option<MetricType>,
        include_expired: bool,
    ) -> Result<Vec<HealthMetric>, OfflineError> {
        let pattern = match metric_type {
            Some(metric_type) => KeyPattern::typed_metrics(owner, metric_type),
            None => KeyPattern::owner_metrics(owner),
        };
        let keys = self.store.keys_matching(&pattern).await?;
        let now = Utc::now();

        let mut metrics = Vec::new();
        for key in keys {
            let Some(text) = self.store.get(&key).await? else {
                continue;
            };

            let entry = match serde_json::from_str::<CacheEntry>(&text) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        target: "offline::cache",
                        key = %key,
                        error = %err,
                        "removing undecodable cache entry"
                    );
                    self.store.remove(&key).await?;
                    continue;
                }
            };

            if !entry.is_valid() {
                tracing::warn!(
                    target: "offline::cache",
                    key = %key,
                    "removing cache entry with checksum mismatch"
                );
                self.store.remove(&key).await?;
                continue;
            }

            if !include_expired && !entry.is_live(now) {
                self.store.remove(&key).await?;
                continue;
            }

            metrics.push(entry.metric);
        }

        Ok(metrics)
    }

    /// Removes entries past their expiry along with any that no longer
    /// decode. Returns how many keys were deleted.
    pub async fn cleanup_expired(&self, owner: &UserId) -> Result<u32, OfflineError> {
        let keys = self
            .store
            .keys_matching(&KeyPattern::owner_metrics(owner))
            .await?;
        let now = Utc::now();

        let mut removed = 0u32;
        for key in keys {
            let Some(text) = self.store.get(&key).await? else {
                continue;
            };

            match serde_json::from_str::<CacheEntry>(&text) {
                Ok(entry) => {
                    if !entry.is_live(now) {
                        self.store.remove(&key).await?;
                        removed += 1;
                    }
                }
                Err(_) => {
                    self.store.remove(&key).await?;
                    removed += 1;
                }
            }
        }

        tracing::debug!(
            target: "offline::cache",
            owner = %owner,
            removed,
            "expired cache entries cleaned up"
        );

        Ok(removed)
    }

    /// Drops every cache entry, queue item and the metadata record for the
    /// owner. Calling it again on an already-empty cache is a no-op.
    pub async fn clear_user_cache(&self, owner: &UserId) -> Result<(), OfflineError> {
        let mut keys = self
            .store
            .keys_matching(&KeyPattern::owner_metrics(owner))
            .await?;
        keys.extend(
            self.store
                .keys_matching(&KeyPattern::owner_queue(owner))
                .await?,
        );
        keys.push(CacheKey::for_metadata(owner).into());

        for key in keys {
            self.store.remove(&key).await?;
        }

        Ok(())
    }

    /// Full-scan statistics. O(n) in the number of cached entries; no
    /// incremental counters are kept.
    pub async fn statistics(&self, owner: &UserId) -> Result<CacheStatistics, OfflineError> {
        let metric_keys = self
            .store
            .keys_matching(&KeyPattern::owner_metrics(owner))
            .await?;
        let queue_keys = self
            .store
            .keys_matching(&KeyPattern::owner_queue(owner))
            .await?;
        let now = Utc::now();

        let mut total = 0u64;
        let mut expired = 0u64;
        let mut size_bytes = 0u64;
        let mut oldest = None;

        for key in metric_keys {
            let Some(text) = self.store.get(&key).await? else {
                continue;
            };
            size_bytes += text.len() as u64;

            // Undecodable entries still occupy space but are not counted;
            // eviction is left to the read path.
            let Ok(entry) = serde_json::from_str::<CacheEntry>(&text) else {
                continue;
            };
            total += 1;
            if !entry.is_live(now) {
                expired += 1;
            }
            oldest = match oldest {
                Some(current) if current <= entry.cached_at => Some(current),
                _ => Some(entry.cached_at),
            };
        }

        Ok(CacheStatistics {
            total_cached_metrics: total,
            expired_metrics: expired,
            pending_sync_items: queue_keys.len() as u64,
            total_cache_size_bytes: size_bytes,
            oldest_cache_entry: oldest,
            last_updated: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::metric_checksum;
    use crate::domain::value_objects::{DataSource, SyncPriority, SyncOperation};
    use crate::domain::entities::SyncQueueItem;
    use crate::infrastructure::storage::MemoryKeyValueStore;

    fn owner() -> UserId {
        UserId::new("u1".into()).unwrap()
    }

    fn metric(id: &str, metric_type: MetricType) -> HealthMetric {
        HealthMetric::new(
            id.into(),
            "u1".into(),
            metric_type,
            72.0,
            "bpm".into(),
            Utc::now(),
            DataSource::HealthConnect,
            0.9,
        )
    }

    fn service() -> (CacheService, Arc<MemoryKeyValueStore>) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let service = CacheService::new(store.clone(), CacheConfig {
            default_ttl_hours: 24,
            max_cache_size_mb: 50,
            status_interval_secs: 30,
        });
        (service, store)
    }

    #[tokio::test]
    async fn cached_metrics_survive_round_trip() {
        let (service, store) = service();
        let owner = owner();
        service
            .cache_metrics(
                &owner,
                vec![metric("m1", MetricType::HeartRate), metric("m2", MetricType::Steps)],
                None,
            )
            .await
            .unwrap();

        let mut ids: Vec<String> = service
            .cached_metrics(&owner, None, false)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["m1", "m2"]);

        // Metadata record is refreshed alongside the entries.
        let metadata = store
            .get(CacheKey::for_metadata(&owner).as_str())
            .await
            .unwrap()
            .expect("metadata record");
        let record: CacheMetadataRecord = serde_json::from_str(&metadata).unwrap();
        assert_eq!(record.new_entries_count, 2);
    }

    #[tokio::test]
    async fn type_filter_narrows_results() {
        let (service, _) = service();
        let owner = owner();
        service
            .cache_metrics(
                &owner,
                vec![metric("m1", MetricType::HeartRate), metric("m2", MetricType::Steps)],
                None,
            )
            .await
            .unwrap();

        let steps = service
            .cached_metrics(&owner, Some(MetricType::Steps), false)
            .await
            .unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id, "m2");
    }

    #[tokio::test]
    async fn expired_entries_are_hidden_and_evicted_on_read() {
        let (service, store) = service();
        let owner = owner();
        let metrics: Vec<_> = (0..10)
            .map(|i| metric(&format!("m{i}"), MetricType::Steps))
            .collect();
        service
            .cache_metrics(&owner, metrics, Some(0))
            .await
            .unwrap();

        assert!(service
            .cached_metrics(&owner, None, false)
            .await
            .unwrap()
            .is_empty());

        // The read removed them; only the metadata record is left behind.
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn include_expired_returns_stale_entries() {
        let (service, _) = service();
        let owner = owner();
        service
            .cache_metrics(&owner, vec![metric("m1", MetricType::Weight)], Some(0))
            .await
            .unwrap();

        let stale = service
            .cached_metrics(&owner, None, true)
            .await
            .unwrap();
        assert_eq!(stale.len(), 1);
    }

    #[tokio::test]
    async fn cleanup_counts_every_expired_entry() {
        let (service, _) = service();
        let owner = owner();
        let metrics: Vec<_> = (0..10)
            .map(|i| metric(&format!("m{i}"), MetricType::Steps))
            .collect();
        service
            .cache_metrics(&owner, metrics, Some(0))
            .await
            .unwrap();

        assert_eq!(service.cleanup_expired(&owner).await.unwrap(), 10);
        assert_eq!(service.cleanup_expired(&owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupted_field_excludes_and_evicts_entry() {
        let (service, store) = service();
        let owner = owner();
        service
            .cache_metrics(&owner, vec![metric("m1", MetricType::HeartRate)], None)
            .await
            .unwrap();

        // Tamper with the stored value without refreshing the checksum.
        let key = CacheKey::for_metric(&owner, MetricType::HeartRate, "m1");
        let text = store.get(key.as_str()).await.unwrap().unwrap();
        let mut entry: CacheEntry = serde_json::from_str(&text).unwrap();
        entry.metric.value = 180.0;
        assert_ne!(metric_checksum(&entry.metric), entry.checksum);
        store
            .put(key.as_str(), &serde_json::to_string(&entry).unwrap())
            .await
            .unwrap();

        assert!(service
            .cached_metrics(&owner, None, false)
            .await
            .unwrap()
            .is_empty());
        assert!(store.get(key.as_str()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn undecodable_entry_is_removed_on_read() {
        let (service, store) = service();
        let owner = owner();
        store
            .put("health_u1_steps_bogus", "not json at all")
            .await
            .unwrap();

        assert!(service
            .cached_metrics(&owner, None, false)
            .await
            .unwrap()
            .is_empty());
        assert!(store.get("health_u1_steps_bogus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_user_cache_is_idempotent_and_scoped() {
        let (service, store) = service();
        let owner = owner();
        let other = UserId::new("u2".into()).unwrap();
        service
            .cache_metrics(&owner, vec![metric("m1", MetricType::Steps)], None)
            .await
            .unwrap();
        let queue_item = SyncQueueItem::new(
            &owner,
            SyncOperation::Upload,
            metric("m1", MetricType::Steps),
            "garmin".into(),
            SyncPriority::Normal,
            3,
        );
        store
            .put(
                CacheKey::for_queue_item(&owner, &queue_item.id).as_str(),
                &serde_json::to_string(&queue_item).unwrap(),
            )
            .await
            .unwrap();
        store.put("health_u2_steps_mx", "{}").await.unwrap();

        service.clear_user_cache(&owner).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.get("health_u2_steps_mx").await.unwrap().is_some());

        // Second call over an empty cache never errors.
        service.clear_user_cache(&owner).await.unwrap();
        service.clear_user_cache(&other).await.unwrap();
    }

    #[tokio::test]
    async fn statistics_reflect_expiry_and_queue_depth() {
        let (service, store) = service();
        let owner = owner();
        service
            .cache_metrics(&owner, vec![metric("m1", MetricType::Steps)], None)
            .await
            .unwrap();
        service
            .cache_metrics(&owner, vec![metric("m2", MetricType::Weight)], Some(0))
            .await
            .unwrap();
        store.put("syncq_u1_item1", "{}").await.unwrap();

        let stats = service.statistics(&owner).await.unwrap();
        assert_eq!(stats.total_cached_metrics, 2);
        assert_eq!(stats.expired_metrics, 1);
        assert_eq!(stats.pending_sync_items, 1);
        assert!(stats.total_cache_size_bytes > 0);
        assert!(stats.oldest_cache_entry.is_some());
    }
}
