pub mod cache_entry;
pub mod cache_status;
pub mod health_metric;
pub mod sync_queue_item;

pub use cache_entry::{metric_checksum, CacheEntry};
pub use cache_status::{
    CacheMetadataRecord, CacheStatistics, CacheStatusSnapshot, SyncQueueStatus, SyncReport,
};
pub use health_metric::HealthMetric;
pub use sync_queue_item::{SyncQueueItem, DEFAULT_MAX_RETRIES};
