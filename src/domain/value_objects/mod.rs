pub mod cache_key;
pub mod data_source;
pub mod metric_type;
pub mod sync_operation;
pub mod sync_priority;
pub mod sync_state;
pub mod user_id;

pub use cache_key::{CacheKey, KeyPattern, METADATA_KEY_PREFIX, METRIC_KEY_PREFIX, QUEUE_KEY_PREFIX};
pub use data_source::DataSource;
pub use metric_type::MetricType;
pub use sync_operation::SyncOperation;
pub use sync_priority::SyncPriority;
pub use sync_state::SyncState;
pub use user_id::UserId;
