use crate::domain::entities::HealthMetric;
use crate::domain::value_objects::{SyncOperation, SyncPriority, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// One pending mutation awaiting upload to a health platform.
///
/// Lifecycle: created while offline or on any mutation; deleted on successful
/// upload or once `retry_count` reaches `max_retries`. No terminal "failed"
/// record is kept past that point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncQueueItem {
    pub id: String,
    pub user_id: String,
    pub operation: SyncOperation,
    pub metric: HealthMetric,
    pub target_platform: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: SyncPriority,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl SyncQueueItem {
    pub fn new(
        owner: &UserId,
        operation: SyncOperation,
        metric: HealthMetric,
        target_platform: String,
        priority: SyncPriority,
        max_retries: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            operation,
            metric,
            target_platform,
            created_at: Utc::now(),
            priority,
            retry_count: 0,
            max_retries,
        }
    }

    /// Still eligible for another upload attempt.
    pub fn retries_remaining(&self) -> bool {
        self.retry_count < self.max_retries
    }
}
