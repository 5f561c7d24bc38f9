pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{ConnectivityMonitor, KeyValueStore, SyncGateway, SyncOutcome};
pub use application::services::{CacheService, SyncCoordinator, SyncPhase, SyncQueueService};
pub use domain::entities::{
    CacheEntry, CacheStatistics, CacheStatusSnapshot, HealthMetric, SyncQueueItem, SyncQueueStatus,
    SyncReport,
};
pub use domain::value_objects::{
    DataSource, MetricType, SyncOperation, SyncPriority, SyncState, UserId,
};
pub use infrastructure::network::WatchConnectivityMonitor;
pub use infrastructure::storage::{MemoryKeyValueStore, SqliteKeyValueStore};
pub use shared::config::{CacheConfig, OfflineConfig, SyncConfig};
pub use shared::error::OfflineError;

/// Installs the tracing subscriber for binaries and tests that want crate
/// logs. Honors `RUST_LOG` when set.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalsync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
