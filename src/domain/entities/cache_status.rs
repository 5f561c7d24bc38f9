use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate view of one owner's cached metrics, computed by a full scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStatistics {
    pub total_cached_metrics: u64,
    pub expired_metrics: u64,
    pub pending_sync_items: u64,
    pub total_cache_size_bytes: u64,
    pub oldest_cache_entry: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

/// Aggregate view of one owner's sync queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncQueueStatus {
    pub total_items: u64,
    pub pending_items: u64,
    pub failed_items: u64,
    pub oldest_item_age_ms: Option<i64>,
    pub queue_size_bytes: u64,
    pub last_processed_at: Option<DateTime<Utc>>,
}

/// Snapshot republished on a fixed interval for consumers to observe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStatusSnapshot {
    pub is_healthy: bool,
    pub total_cached_items: u64,
    pub pending_sync_items: u64,
    pub cache_usage_bytes: u64,
    pub max_cache_usage_bytes: u64,
    pub last_cleanup: DateTime<Utc>,
    pub queue_status: SyncQueueStatus,
}

/// Per-owner metadata record written alongside cached entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheMetadataRecord {
    pub last_updated: DateTime<Utc>,
    pub new_entries_count: u64,
}

/// Outcome of a full sync attempt over the pending queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncReport {
    pub synced_count: u32,
    pub failed_count: u32,
    pub conflict_count: u32,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0 && self.conflict_count == 0
    }
}
