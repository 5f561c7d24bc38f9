pub mod cache_service;
pub mod sync_coordinator;
pub mod sync_queue_service;

pub use cache_service::CacheService;
pub use sync_coordinator::{SyncCoordinator, SyncPhase};
pub use sync_queue_service::SyncQueueService;
