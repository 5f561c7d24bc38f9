use crate::domain::entities::HealthMetric;
use crate::domain::value_objects::{SyncState, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A cached health metric wrapped with expiry and integrity bookkeeping.
///
/// An entry is *live* while `now < expires_at` and *valid* while the stored
/// checksum matches the one recomputed from the metric. An entry failing
/// either check is removed on the next read, never repaired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub id: String,
    pub user_id: String,
    pub metric: HealthMetric,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub sync_state: SyncState,
    pub checksum: String,
}

impl CacheEntry {
    /// Wraps a metric for storage. `ttl_hours` of 0 produces an entry that is
    /// already expired.
    pub fn seal(owner: &UserId, metric: HealthMetric, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let checksum = metric_checksum(&metric);
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            metric,
            cached_at: now,
            expires_at: now + Duration::hours(ttl_hours),
            sync_state: SyncState::PendingUpload,
            checksum,
        }
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        metric_checksum(&self.metric) == self.checksum
    }
}

/// Content checksum over the metric's fields. Detects corruption of the
/// stored text, not tampering by an adversary.
pub fn metric_checksum(metric: &HealthMetric) -> String {
    let data = format!(
        "{}{}{}{}{}{}{}",
        metric.id,
        metric.user_id,
        metric.metric_type,
        metric.value,
        metric.unit,
        metric.timestamp.to_rfc3339(),
        metric.source,
    );
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
